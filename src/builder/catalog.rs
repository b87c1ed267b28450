//! Expansion of discovered toolchains into buildable platforms.

use std::collections::BTreeSet;

use crate::core::platform::{Arch, Platform, PlatformTag, TargetOs};
use crate::core::toolchain::{Toolchain, Toolchains};
use crate::util::shell::Shell;

/// Every platform the found toolchains can build, in the fixed order.
///
/// Android expands into x64 and arm64 from one NDK root; every other
/// toolchain maps to exactly one platform. With `host_only`, only
/// platforms native to the host survive.
pub fn expand(toolchains: &Toolchains, host_only: bool) -> Vec<Platform> {
    let host = toolchains.host;
    let mut platforms = Vec::new();

    let mut push = |os: TargetOs, arch: Arch, slot: &Option<Toolchain>| {
        if let Some(tc) = Toolchains::usable(slot) {
            platforms.push(Platform::new(PlatformTag::new(os, arch), tc.clone(), host));
        }
    };

    push(TargetOs::Windows, Arch::X64, &toolchains.windows);
    push(TargetOs::Osx, Arch::Arm64, &toolchains.osx);
    push(TargetOs::Linux, Arch::X64, &toolchains.linux_x64);
    push(TargetOs::Linux, Arch::Arm64, &toolchains.linux_arm64);
    push(TargetOs::Android, Arch::X64, &toolchains.android);
    push(TargetOs::Android, Arch::Arm64, &toolchains.android);
    push(TargetOs::Ios, Arch::Arm64, &toolchains.ios);
    push(TargetOs::IosSimulator, Arch::Arm64, &toolchains.ios_simulator);

    if host_only {
        platforms.retain(|p| p.is_host_buildable());
    }

    platforms
}

/// Keep only the platforms named by `+tag` requests.
///
/// An empty request keeps everything. Requested tags with no available
/// platform are reported and otherwise ignored.
pub fn filter_by_tags(platforms: Vec<Platform>, requested: &[PlatformTag], shell: &Shell) -> Vec<Platform> {
    if requested.is_empty() {
        return platforms;
    }

    let wanted: BTreeSet<PlatformTag> = requested.iter().copied().collect();
    let available: BTreeSet<PlatformTag> = platforms.iter().map(|p| p.tag).collect();

    for tag in wanted.difference(&available) {
        shell.warn(format!("Requested platform {} is not available, skipping.", tag));
    }

    platforms
        .into_iter()
        .filter(|p| wanted.contains(&p.tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::HostOs;

    fn windows_host_all() -> Toolchains {
        let mut tc = Toolchains::empty(HostOs::Windows);
        tc.windows = Some(Toolchain::found(TargetOs::Windows, Arch::X64, "C:/VC"));
        tc.linux_x64 = Some(Toolchain::found(TargetOs::Linux, Arch::X64, "C:/linux-x64"));
        tc.linux_arm64 = Some(Toolchain::found(TargetOs::Linux, Arch::Arm64, "C:/linux-arm64"));
        tc.android = Some(Toolchain::found(TargetOs::Android, Arch::Arm64, "C:/ndk"));
        tc
    }

    fn tags(platforms: &[Platform]) -> Vec<String> {
        platforms.iter().map(|p| p.tag.to_string()).collect()
    }

    #[test]
    fn test_expand_fixed_order() {
        let platforms = expand(&windows_host_all(), false);
        assert_eq!(
            tags(&platforms),
            vec!["windows-x64", "linux-x64", "linux-arm64", "android-x64", "android-arm64"]
        );
        // both Android entries share the NDK root
        assert_eq!(platforms[3].root(), platforms[4].root());
    }

    #[test]
    fn test_expand_host_only() {
        let platforms = expand(&windows_host_all(), true);
        assert_eq!(tags(&platforms), vec!["windows-x64"]);

        let mut mac = Toolchains::empty(HostOs::MacOs);
        mac.osx = Some(Toolchain::found(TargetOs::Osx, Arch::Arm64, "/SDKs/MacOSX.sdk"));
        mac.ios = Some(Toolchain::found(TargetOs::Ios, Arch::Arm64, "/SDKs/iPhoneOS.sdk"));
        assert_eq!(tags(&expand(&mac, false)), vec!["osx-arm64", "ios-arm64"]);
        assert_eq!(tags(&expand(&mac, true)), vec!["osx-arm64"]);
    }

    #[test]
    fn test_missing_toolchains_are_skipped() {
        let mut tc = Toolchains::empty(HostOs::Windows);
        tc.windows = Some(Toolchain::found(TargetOs::Windows, Arch::X64, "C:/VC"));
        tc.linux_x64 = Some(Toolchain::missing(TargetOs::Linux, Arch::X64));

        assert_eq!(tags(&expand(&tc, false)), vec!["windows-x64"]);
    }

    #[test]
    fn test_filter_by_tags() {
        let shell = Shell::captured();
        let requested = vec![
            "+linux-arm64".parse::<PlatformTag>().unwrap(),
            "+ios-arm64".parse::<PlatformTag>().unwrap(),
        ];

        let platforms = filter_by_tags(expand(&windows_host_all(), false), &requested, &shell);

        assert_eq!(tags(&platforms), vec!["linux-arm64"]);
        assert!(shell
            .captured_output()
            .contains("Requested platform ios-arm64 is not available"));
    }

    #[test]
    fn test_no_tags_keeps_everything() {
        let platforms = filter_by_tags(expand(&windows_host_all(), false), &[], &Shell::captured());
        assert_eq!(platforms.len(), 5);
    }
}
