//! Resolved external compiler suites.

use std::path::{Path, PathBuf};

use crate::core::platform::{Arch, HostOs, TargetOs};

/// One external compiler suite located through the environment.
///
/// A toolchain with `found == false` is only kept so it can be reported;
/// it never backs a [`Platform`](crate::core::platform::Platform).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub target_os: TargetOs,
    /// Architecture named in discovery logs. Android roots serve both.
    pub arch: Arch,
    /// Filesystem root of the suite (or SDK for Apple targets).
    pub root: PathBuf,
    pub found: bool,
    pub display_name: String,
    /// Xcode command-line tools root, used by Apple targets.
    pub tools_root: Option<PathBuf>,
}

impl Toolchain {
    /// A located toolchain.
    pub fn found(target_os: TargetOs, arch: Arch, root: impl Into<PathBuf>) -> Self {
        Toolchain {
            target_os,
            arch,
            root: root.into(),
            found: true,
            display_name: format!("{}-{}", target_os.pretty(), arch.pretty()),
            tools_root: None,
        }
    }

    /// A toolchain that was looked for but is unusable.
    pub fn missing(target_os: TargetOs, arch: Arch) -> Self {
        Toolchain {
            target_os,
            arch,
            root: PathBuf::new(),
            found: false,
            display_name: format!("{}-{}", target_os.pretty(), arch.pretty()),
            tools_root: None,
        }
    }

    pub fn with_tools_root(mut self, tools_root: Option<PathBuf>) -> Self {
        self.tools_root = tools_root;
        self
    }

    /// Directory holding Apple developer binaries (`<tools>/usr/bin`).
    ///
    /// Returns `None` when the tools root is unknown, in which case tools
    /// are resolved through `PATH`.
    pub fn apple_bin_dir(&self) -> Option<PathBuf> {
        self.tools_root
            .as_ref()
            .map(|tools| tools.join("usr").join("bin"))
    }
}

/// Every toolchain slot the current host can discover.
///
/// Slots not probed on this host stay `None`.
#[derive(Debug, Clone)]
pub struct Toolchains {
    pub host: HostOs,
    pub windows: Option<Toolchain>,
    pub linux_x64: Option<Toolchain>,
    pub linux_arm64: Option<Toolchain>,
    pub android: Option<Toolchain>,
    pub osx: Option<Toolchain>,
    pub ios: Option<Toolchain>,
    pub ios_simulator: Option<Toolchain>,
    /// `BUILD_TOOLS_PATH` on macOS hosts.
    pub build_tools: Option<PathBuf>,
    /// `VULKAN_SDK`, if set.
    pub vulkan_sdk: Option<PathBuf>,
}

impl Toolchains {
    pub fn empty(host: HostOs) -> Self {
        Toolchains {
            host,
            windows: None,
            linux_x64: None,
            linux_arm64: None,
            android: None,
            osx: None,
            ios: None,
            ios_simulator: None,
            build_tools: None,
            vulkan_sdk: None,
        }
    }

    /// All probed slots, found or not.
    pub fn iter(&self) -> impl Iterator<Item = &Toolchain> {
        [
            &self.windows,
            &self.osx,
            &self.linux_x64,
            &self.linux_arm64,
            &self.android,
            &self.ios,
            &self.ios_simulator,
        ]
        .into_iter()
        .flatten()
    }

    /// The slot for a toolchain if it was found.
    pub fn usable(slot: &Option<Toolchain>) -> Option<&Toolchain> {
        slot.as_ref().filter(|t| t.found)
    }

    pub fn vulkan_sdk(&self) -> Option<&Path> {
        self.vulkan_sdk.as_deref()
    }
}
