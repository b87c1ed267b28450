//! Clang dialect (Linux, Android and Apple targets).

use std::path::PathBuf;

use crate::core::language::Language;
use crate::core::platform::{Arch, HostOs, Platform};

use super::{BuildOperation, CommandSpec, Dialect, FlagStyle};

/// Android API level baked into the NDK triples.
const ANDROID_API_LEVEL: u32 = 28;
const MACOS_MIN_VERSION: &str = "11.0";
const IOS_MIN_VERSION: &str = "16.0";

/// Target families driven by a Clang toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClangTarget {
    Linux,
    Android,
    Osx,
    Ios,
    IosSimulator,
}

impl ClangTarget {
    /// LLVM target triple for this family on `arch`.
    ///
    /// # Panics
    ///
    /// Apple families only define arm64 triples; an x64 Apple platform
    /// means the catalog and the synthesizer disagree.
    pub fn triple(&self, arch: Arch) -> String {
        match (self, arch) {
            (ClangTarget::Linux, Arch::X64) => "x86_64-unknown-linux-gnu".to_string(),
            (ClangTarget::Linux, Arch::Arm64) => "aarch64-unknown-linux-gnueabi".to_string(),
            (ClangTarget::Android, Arch::X64) => {
                format!("x86_64-none-linux-android{}", ANDROID_API_LEVEL)
            }
            (ClangTarget::Android, Arch::Arm64) => {
                format!("aarch64-none-linux-android{}", ANDROID_API_LEVEL)
            }
            (ClangTarget::Osx, Arch::Arm64) => format!("arm64-apple-macos{}", MACOS_MIN_VERSION),
            (ClangTarget::Ios, Arch::Arm64) => format!("arm64-apple-ios{}", IOS_MIN_VERSION),
            (ClangTarget::IosSimulator, Arch::Arm64) => {
                format!("arm64-apple-ios{}-simulator", IOS_MIN_VERSION)
            }
            (target @ (ClangTarget::Osx | ClangTarget::Ios | ClangTarget::IosSimulator), Arch::X64) => {
                panic!("no target triple defined for {:?} on x64", target)
            }
        }
    }

    fn is_apple(&self) -> bool {
        matches!(self, ClangTarget::Osx | ClangTarget::Ios | ClangTarget::IosSimulator)
    }
}

/// Clang driver plus archiver for one platform.
#[derive(Debug, Clone)]
pub struct ClangDialect {
    target: ClangTarget,
    arch: Arch,
    /// Toolchain root (sysroot / SDK / NDK).
    root: PathBuf,
    /// Directory with clang, clang++ and the archiver; `None` means `PATH`.
    bin_dir: Option<PathBuf>,
    host: HostOs,
}

impl ClangDialect {
    pub fn new(platform: &Platform, target: ClangTarget) -> Self {
        let root = platform.root().to_path_buf();
        let bin_dir = match target {
            ClangTarget::Linux => Some(root.join("bin")),
            ClangTarget::Android => Some(Self::ndk_prebuilt(&root, platform.host).join("bin")),
            ClangTarget::Osx | ClangTarget::Ios | ClangTarget::IosSimulator => {
                platform.toolchain.apple_bin_dir()
            }
        };

        ClangDialect {
            target,
            arch: platform.arch(),
            root,
            bin_dir,
            host: platform.host,
        }
    }

    /// `<ndk>/toolchains/llvm/prebuilt/<host-tag>`
    fn ndk_prebuilt(root: &std::path::Path, host: HostOs) -> PathBuf {
        root.join("toolchains")
            .join("llvm")
            .join("prebuilt")
            .join(host.ndk_host_tag())
    }

    fn tool(&self, name: &str) -> PathBuf {
        // Apple tools come from Xcode and never carry an .exe suffix
        let file = if self.target.is_apple() {
            name.to_string()
        } else {
            format!("{}{}", name, self.host.exe_suffix())
        };

        match &self.bin_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }

    pub fn triple(&self) -> String {
        self.target.triple(self.arch)
    }
}

impl Dialect for ClangDialect {
    fn style(&self) -> FlagStyle {
        FlagStyle::Clang
    }

    fn compiler_path(&self, lang: Language) -> PathBuf {
        match lang {
            Language::C => self.tool("clang"),
            Language::Cxx => self.tool("clang++"),
        }
    }

    fn static_linker_path(&self) -> PathBuf {
        match self.target {
            ClangTarget::Osx => self.tool("libtool"),
            ClangTarget::Ios | ClangTarget::IosSimulator => self.tool("ar"),
            ClangTarget::Linux | ClangTarget::Android => self.tool("llvm-ar"),
        }
    }

    fn baseline_flags(&self) -> Vec<String> {
        vec!["-Werror".to_string()]
    }

    fn mode_flags(&self, debug: bool) -> Vec<String> {
        let flags: [&str; 3] = if debug {
            ["-g", "-O0", "-DDEBUG"]
        } else {
            ["-O2", "-DNDEBUG", "-flto"]
        };
        flags.into_iter().map(String::from).collect()
    }

    fn extra_env_defines(&self) -> Vec<(&'static str, &'static str)> {
        match self.target {
            ClangTarget::Android => vec![("ANDROID", "1"), ("_FORTIFY_SOURCE", "2")],
            _ => Vec::new(),
        }
    }

    fn cross_target_flags(&self) -> Vec<String> {
        let root = self.root.display().to_string();
        match self.target {
            ClangTarget::Linux => vec![
                format!("--sysroot={}", root),
                format!("--target={}", self.triple()),
            ],
            ClangTarget::Android => {
                let prebuilt = Self::ndk_prebuilt(&self.root, self.host);
                let glue = self
                    .root
                    .join("sources")
                    .join("android")
                    .join("native_app_glue");
                vec![
                    format!("--sysroot={}", prebuilt.join("sysroot").display()),
                    "-fPIC".to_string(),
                    format!("-I{}", glue.display()),
                    format!("--target={}", self.triple()),
                ]
            }
            ClangTarget::Osx => vec![
                "--sysroot".to_string(),
                root,
                "-target".to_string(),
                self.triple(),
            ],
            ClangTarget::Ios | ClangTarget::IosSimulator => vec![
                "--sysroot".to_string(),
                root,
                format!("-miphoneos-version-min={}", IOS_MIN_VERSION),
                "-target".to_string(),
                self.triple(),
                "-arch".to_string(),
                "arm64".to_string(),
            ],
        }
    }

    fn object_output(&self, cmd: CommandSpec, op: &BuildOperation<'_>) -> CommandSpec {
        cmd.arg("-o").arg(op.output.display().to_string())
    }

    fn exe_output(&self, cmd: CommandSpec, op: &BuildOperation<'_>) -> CommandSpec {
        let mut cmd = cmd.arg("-o").arg(op.output.display().to_string());
        // Debug info already rides on -g from the mode flags
        for lib in &op.extra_libs {
            cmd = cmd.arg(format!("-l{}", lib));
        }
        cmd
    }

    fn archive_command(&self, op: &BuildOperation<'_>) -> CommandSpec {
        let cmd = CommandSpec::new(self.static_linker_path(), FlagStyle::Clang);
        let cmd = match self.target {
            ClangTarget::Osx => cmd.arg("-static").arg("-o"),
            _ => cmd.arg("rcs"),
        };
        cmd.arg(op.output.display().to_string()).with_paths(&op.inputs)
    }
}
