//! Toolchain discovery from environment configuration.
//!
//! Each toolchain is announced by a presence flag (`<NAME>_FOUND`-style,
//! usable only when it is exactly `"1"`) and a path variable. A missing
//! toolchain is a warning; a flagged toolchain without a path is a failed
//! `Toolchain Path Query` ledger entry. Neither stops the run.

use std::path::PathBuf;

use tracing::debug;

use crate::core::platform::{Arch, HostOs, TargetOs};
use crate::core::summary::{RunSummary, StageOutcome};
use crate::core::toolchain::{Toolchain, Toolchains};
use crate::util::shell::Shell;

/// Read-only view of environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Environment variable pair for one toolchain slot.
struct Probe {
    target_os: TargetOs,
    arch: Arch,
    found_var: &'static str,
    path_var: &'static str,
}

const WINDOWS_HOST_PROBES: [Probe; 4] = [
    Probe {
        target_os: TargetOs::Windows,
        arch: Arch::X64,
        found_var: "WINDOWS_TOOLCHAIN_FOUND",
        path_var: "WINDOWS_TOOLCHAIN",
    },
    Probe {
        target_os: TargetOs::Linux,
        arch: Arch::X64,
        found_var: "LINUX_X64_TOOLCHAIN_FOUND",
        path_var: "LINUX_X64_TOOLCHAIN",
    },
    Probe {
        target_os: TargetOs::Linux,
        arch: Arch::Arm64,
        found_var: "LINUX_ARM64_TOOLCHAIN_FOUND",
        path_var: "LINUX_ARM64_TOOLCHAIN",
    },
    // One NDK root serves both Android architectures
    Probe {
        target_os: TargetOs::Android,
        arch: Arch::Arm64,
        found_var: "ANDROID_TOOLCHAIN_FOUND",
        path_var: "ANDROID_TOOLCHAIN",
    },
];

const MACOS_HOST_PROBES: [Probe; 3] = [
    Probe {
        target_os: TargetOs::Ios,
        arch: Arch::Arm64,
        found_var: "IOS_SDK_FOUND",
        path_var: "IOS_SDK_PATH",
    },
    Probe {
        target_os: TargetOs::IosSimulator,
        arch: Arch::Arm64,
        found_var: "IOS_SIM_SDK_FOUND",
        path_var: "IOS_SIM_SDK_PATH",
    },
    Probe {
        target_os: TargetOs::Osx,
        arch: Arch::Arm64,
        found_var: "OSX_SDK_FOUND",
        path_var: "OSX_SDK_PATH",
    },
];

/// Non-empty value of `key`.
fn non_empty(env: &dyn EnvSource, key: &str) -> Option<String> {
    env.var(key).filter(|v| !v.is_empty())
}

fn probe(env: &dyn EnvSource, probe: &Probe, shell: &Shell, summary: &mut RunSummary) -> Toolchain {
    let missing = Toolchain::missing(probe.target_os, probe.arch);

    if env.var(probe.found_var).as_deref() != Some("1") {
        shell.warn(format!("{} toolchain not found!", missing.display_name));
        return missing;
    }

    let Some(path) = non_empty(env, probe.path_var) else {
        shell.error(format!("{} toolchain path not set!", missing.display_name));
        summary.record(StageOutcome::failure(format!(
            "{} Toolchain Path Query",
            missing.display_name
        )));
        return missing;
    };

    shell.info(format!(
        "Using {} {} toolchain at: {}.",
        probe.target_os.pretty(),
        probe.arch.pretty(),
        path
    ));
    debug!("{} = {}", probe.path_var, path);
    Toolchain::found(probe.target_os, probe.arch, path)
}

/// Probe every toolchain the host can drive.
///
/// Path-query failures are appended to `summary`; everything else is only
/// reported through `shell`.
pub fn discover(env: &dyn EnvSource, host: HostOs, shell: &Shell, summary: &mut RunSummary) -> Toolchains {
    let mut toolchains = Toolchains::empty(host);

    shell.section_start();
    match host {
        HostOs::Windows => {
            let [windows, linux_x64, linux_arm64, android] = &WINDOWS_HOST_PROBES;
            toolchains.windows = Some(probe(env, windows, shell, summary));
            toolchains.linux_x64 = Some(probe(env, linux_x64, shell, summary));
            toolchains.linux_arm64 = Some(probe(env, linux_arm64, shell, summary));
            toolchains.android = Some(probe(env, android, shell, summary));
        }
        HostOs::MacOs => {
            let tools = non_empty(env, "BUILD_TOOLS_PATH").map(PathBuf::from);
            if tools.is_none() {
                debug!("BUILD_TOOLS_PATH unset, Apple tools resolve through PATH");
            }
            toolchains.build_tools = tools.clone();

            let [ios, ios_simulator, osx] = &MACOS_HOST_PROBES;
            toolchains.ios = Some(probe(env, ios, shell, summary).with_tools_root(tools.clone()));
            toolchains.ios_simulator =
                Some(probe(env, ios_simulator, shell, summary).with_tools_root(tools.clone()));
            toolchains.osx = Some(probe(env, osx, shell, summary).with_tools_root(tools));
        }
    }
    shell.section_end();

    toolchains.vulkan_sdk = non_empty(env, "VULKAN_SDK").map(PathBuf::from);
    toolchains
}
