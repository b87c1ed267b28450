//! Test fixtures for common test scenarios.
//!
//! Platform builders with plausible toolchain roots, the default project
//! layout, and a writable project tree for filesystem tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::layout::ProjectLayout;
use crate::core::platform::{Arch, HostOs, Platform, PlatformTag, TargetOs};
use crate::core::toolchain::Toolchain;
use crate::util::config::Config;

/// A platform backed by a made-up but typical toolchain root.
pub fn platform(os: TargetOs, arch: Arch, host: HostOs) -> Platform {
    let root = match os {
        TargetOs::Windows => "C:/VC/Tools/MSVC/14.40",
        TargetOs::Linux => "C:/Toolchains/linux",
        TargetOs::Android => "C:/Android/ndk",
        TargetOs::Osx => "/SDKs/MacOSX.sdk",
        TargetOs::Ios => "/SDKs/iPhoneOS.sdk",
        TargetOs::IosSimulator => "/SDKs/iPhoneSimulator.sdk",
    };
    platform_at(os, arch, host, root)
}

/// A platform whose toolchain lives at `root`.
pub fn platform_at(os: TargetOs, arch: Arch, host: HostOs, root: &str) -> Platform {
    Platform::new(PlatformTag::new(os, arch), Toolchain::found(os, arch, root), host)
}

/// An arm64 Apple platform on a macOS host.
pub fn apple_platform(os: TargetOs, sdk: &str, tools: Option<&str>) -> Platform {
    let toolchain = Toolchain::found(os, Arch::Arm64, sdk).with_tools_root(tools.map(PathBuf::from));
    Platform::new(PlatformTag::new(os, Arch::Arm64), toolchain, HostOs::MacOs)
}

/// The default layout rooted at `/proj`.
pub fn default_layout() -> ProjectLayout {
    ProjectLayout::resolve("/proj", &Config::default())
}

/// Fixture for a project tree on disk.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Files (path relative to project root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl ProjectFixture {
    /// Create a new empty project fixture.
    pub fn new() -> Self {
        ProjectFixture {
            files: BTreeMap::new(),
        }
    }

    /// The default layout with every entry-point source present.
    pub fn library() -> Self {
        ProjectFixture::new()
            .with_file("Source/zzzz_Unity.c", "#include \"Library.c\"\n")
            .with_file("Source/Library.c", "int Library_Init(void) { return 0; }\n")
            .with_file(
                "Source/Dependencies/PNSLR_Intrinsics/Intrinsics.c",
                "int Intrinsics_Init(void) { return 0; }\n",
            )
            .with_file("Tools/TestRunner/zzzz_TestRunner.c", "int main(void) { return 0; }\n")
            .with_file("Tools/BindGen/BindingsGenerator.c", "int main(void) { return 0; }\n")
    }

    /// Add a test source to the test runner directory.
    pub fn with_test(self, name: &str) -> Self {
        let body = "MAIN_TEST_FN(ctx)\n{\n}\n".to_string();
        self.with_file(format!("Tools/TestRunner/{}.c", name), body)
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Write the project to `base_path`.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        for (path, content) in &self.files {
            let full = base_path.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full, content)?;
        }
        Ok(base_path.to_path_buf())
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        ProjectFixture::new()
    }
}
