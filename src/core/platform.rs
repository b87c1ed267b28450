//! Platform identity: target operating systems, architectures and hosts.
//!
//! Every platform the orchestrator knows about is a member of a closed
//! enumeration, so dialect and triple selection can be matched exhaustively.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::errors::BuildError;
use crate::core::toolchain::Toolchain;

/// Operating system a platform produces binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Windows,
    Linux,
    Osx,
    Android,
    Ios,
    IosSimulator,
}

impl TargetOs {
    /// Tag used in artifact file names and platform tags (e.g. "iossimulator").
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::Windows => "windows",
            TargetOs::Linux => "linux",
            TargetOs::Osx => "osx",
            TargetOs::Android => "android",
            TargetOs::Ios => "ios",
            TargetOs::IosSimulator => "iossimulator",
        }
    }

    /// Human-readable name used in stage labels.
    pub fn pretty(&self) -> &'static str {
        match self {
            TargetOs::Windows => "Windows",
            TargetOs::Linux => "Linux",
            TargetOs::Osx => "macOS",
            TargetOs::Android => "Android",
            TargetOs::Ios => "iOS",
            TargetOs::IosSimulator => "iOS-Simulator",
        }
    }

    /// Suffix of the platform-identity define (`<PREFIX>_<suffix>`).
    ///
    /// The simulator shares the iOS define.
    pub fn define_suffix(&self) -> &'static str {
        match self {
            TargetOs::Windows => "WINDOWS",
            TargetOs::Linux => "LINUX",
            TargetOs::Osx => "OSX",
            TargetOs::Android => "ANDROID",
            TargetOs::Ios | TargetOs::IosSimulator => "IOS",
        }
    }

    /// Desktop targets get the test runner and bindings generator.
    pub fn is_desktop(&self) -> bool {
        matches!(self, TargetOs::Windows | TargetOs::Linux | TargetOs::Osx)
    }

    pub fn object_extension(&self) -> &'static str {
        match self {
            TargetOs::Windows => "obj",
            _ => "o",
        }
    }

    pub fn static_lib_prefix(&self) -> &'static str {
        match self {
            TargetOs::Windows => "",
            _ => "lib",
        }
    }

    pub fn static_lib_extension(&self) -> &'static str {
        match self {
            TargetOs::Windows => "lib",
            _ => "a",
        }
    }

    pub fn exe_suffix(&self) -> &'static str {
        match self {
            TargetOs::Windows => ".exe",
            _ => "",
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }

    pub fn pretty(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "ARM64",
        }
    }

    pub fn define_suffix(&self) -> &'static str {
        match self {
            Arch::X64 => "X64",
            Arch::Arm64 => "ARM64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The machine the orchestrator itself runs on.
///
/// Only Windows and macOS hosts carry toolchain discovery rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Windows,
    #[serde(alias = "osx", alias = "darwin")]
    MacOs,
}

impl HostOs {
    /// Detect the running host.
    pub fn current() -> Result<Self, BuildError> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a host.
    pub fn from_os_name(os: &str) -> Result<Self, BuildError> {
        match os {
            "windows" => Ok(HostOs::Windows),
            "macos" => Ok(HostOs::MacOs),
            other => Err(BuildError::UnsupportedHost(other.to_string())),
        }
    }

    /// Suffix of executables that run on this host.
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            HostOs::Windows => ".exe",
            HostOs::MacOs => "",
        }
    }

    /// Directory name of the prebuilt LLVM toolchain inside an Android NDK.
    pub fn ndk_host_tag(&self) -> &'static str {
        match self {
            HostOs::Windows => "windows-x86_64",
            HostOs::MacOs => "darwin-x86_64",
        }
    }

    /// The target OS whose binaries run natively on this host.
    pub fn native_target(&self) -> TargetOs {
        match self {
            HostOs::Windows => TargetOs::Windows,
            HostOs::MacOs => TargetOs::Osx,
        }
    }
}

impl std::str::FromStr for HostOs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win32" => Ok(HostOs::Windows),
            "macos" | "osx" | "darwin" => Ok(HostOs::MacOs),
            _ => Err(format!(
                "invalid host '{}'; expected 'windows' or 'macos'",
                s
            )),
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOs::Windows => f.write_str("windows"),
            HostOs::MacOs => f.write_str("macos"),
        }
    }
}

/// A `(target OS, architecture)` pair written as `<tgt>-<arch>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlatformTag {
    pub os: TargetOs,
    pub arch: Arch,
}

impl PlatformTag {
    /// Every buildable pair, in the fixed iteration order.
    pub const ALL: [PlatformTag; 8] = [
        PlatformTag::new(TargetOs::Windows, Arch::X64),
        PlatformTag::new(TargetOs::Osx, Arch::Arm64),
        PlatformTag::new(TargetOs::Linux, Arch::X64),
        PlatformTag::new(TargetOs::Linux, Arch::Arm64),
        PlatformTag::new(TargetOs::Android, Arch::X64),
        PlatformTag::new(TargetOs::Android, Arch::Arm64),
        PlatformTag::new(TargetOs::Ios, Arch::Arm64),
        PlatformTag::new(TargetOs::IosSimulator, Arch::Arm64),
    ];

    pub const fn new(os: TargetOs, arch: Arch) -> Self {
        PlatformTag { os, arch }
    }

    /// Label prefix used for stage names, e.g. `Linux-ARM64`.
    pub fn pretty(&self) -> String {
        format!("{}-{}", self.os.pretty(), self.arch.pretty())
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

impl std::str::FromStr for PlatformTag {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start_matches('+').to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.to_string() == trimmed)
            .ok_or_else(|| BuildError::UnknownPlatformTag(s.to_string()))
    }
}

/// One buildable platform backed by a discovered toolchain.
#[derive(Debug, Clone)]
pub struct Platform {
    pub tag: PlatformTag,
    /// The toolchain this platform builds with; always `found`.
    pub toolchain: Toolchain,
    /// Host the orchestrator runs on.
    pub host: HostOs,
}

impl Platform {
    pub fn new(tag: PlatformTag, toolchain: Toolchain, host: HostOs) -> Self {
        debug_assert!(toolchain.found, "platform backed by a missing toolchain");
        Platform {
            tag,
            toolchain,
            host,
        }
    }

    pub fn os(&self) -> TargetOs {
        self.tag.os
    }

    pub fn arch(&self) -> Arch {
        self.tag.arch
    }

    /// Root of the backing toolchain.
    pub fn root(&self) -> &Path {
        &self.toolchain.root
    }

    /// Buildable on this host without cross-sysroot flags.
    pub fn is_host_buildable(&self) -> bool {
        self.tag.os == self.host.native_target()
    }

    /// Executables built for this platform can be launched on the host.
    pub fn can_run_on_host(&self) -> bool {
        self.is_host_buildable()
    }

    /// `<PrettyTgt>-<PrettyArch> <stage>`.
    pub fn stage_name(&self, stage: &str) -> String {
        format!("{} {}", self.tag.pretty(), stage)
    }

    /// `<name>-<tgt>-<arch>.{obj|o}`
    pub fn object_file_name(&self, name: &str) -> String {
        format!(
            "{}-{}.{}",
            name,
            self.tag,
            self.tag.os.object_extension()
        )
    }

    /// `(lib)?<name>-<tgt>-<arch>.{lib|a}`
    pub fn static_lib_file_name(&self, name: &str) -> String {
        format!(
            "{}{}-{}.{}",
            self.tag.os.static_lib_prefix(),
            name,
            self.tag,
            self.tag.os.static_lib_extension()
        )
    }

    /// `<name>-<tgt>-<arch>(.exe)?`
    pub fn exe_file_name(&self, name: &str) -> String {
        format!("{}-{}{}", name, self.tag, self.tag.os.exe_suffix())
    }
}
