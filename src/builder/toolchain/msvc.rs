//! MSVC dialect (Windows targets).

use std::path::PathBuf;

use crate::core::language::Language;
use crate::core::platform::Platform;

use super::{BuildOperation, CommandSpec, Dialect, FlagStyle};

/// `cl.exe` / `lib.exe` from a Visual C++ tools root.
#[derive(Debug, Clone)]
pub struct MsvcDialect {
    /// `<root>/bin/HostX64/x64`
    bin_dir: PathBuf,
}

impl MsvcDialect {
    pub fn new(platform: &Platform) -> Self {
        MsvcDialect {
            bin_dir: platform.root().join("bin").join("HostX64").join("x64"),
        }
    }
}

impl Dialect for MsvcDialect {
    fn style(&self) -> FlagStyle {
        FlagStyle::Msvc
    }

    fn compiler_path(&self, _lang: Language) -> PathBuf {
        // cl.exe drives both C and C++
        self.bin_dir.join("cl.exe")
    }

    fn static_linker_path(&self) -> PathBuf {
        self.bin_dir.join("lib.exe")
    }

    fn baseline_flags(&self) -> Vec<String> {
        ["/Brepro", "/nologo", "/Wall", "/WX"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn mode_flags(&self, debug: bool) -> Vec<String> {
        let flags: [&str; 3] = if debug {
            ["/Zi", "/Od", "/D_DEBUG"]
        } else {
            ["/O2", "/DNDEBUG", "/GL"]
        };
        flags.into_iter().map(String::from).collect()
    }

    fn cross_target_flags(&self) -> Vec<String> {
        Vec::new()
    }

    fn object_output(&self, cmd: CommandSpec, op: &BuildOperation<'_>) -> CommandSpec {
        let mut cmd = cmd.arg(format!("/Fo{}", op.output.display()));
        if op.debug {
            cmd = cmd.arg(format!("/Fd{}", op.output.with_extension("pdb").display()));
        }
        cmd
    }

    fn exe_output(&self, cmd: CommandSpec, op: &BuildOperation<'_>) -> CommandSpec {
        let mut cmd = cmd.arg(format!("/Fe{}", op.output.display()));

        // System libraries
        for lib in &op.extra_libs {
            cmd = cmd.arg(format!("{}.lib", lib));
        }

        if op.debug {
            cmd = cmd
                .arg("/DEBUG")
                .arg(format!("/Fd{}", op.output.with_extension("pdb").display()));
        }

        // Intermediate objects land next to the executable; a bare file
        // name keeps the compiler's default
        if let Some(dir) = op.output.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd = cmd.arg(format!("/Fo{}/", dir.display()));
        }

        cmd
    }

    fn archive_command(&self, op: &BuildOperation<'_>) -> CommandSpec {
        CommandSpec::new(self.static_linker_path(), FlagStyle::Msvc)
            .arg("/Brepro")
            .arg("/NOLOGO")
            .arg(format!("/OUT:{}", op.output.display()))
            .with_paths(&op.inputs)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::super::synthesize;
    use super::*;
    use crate::core::platform::{Arch, HostOs, TargetOs};
    use crate::test_support::fixtures::platform_at;

    fn windows() -> Platform {
        platform_at(TargetOs::Windows, Arch::X64, HostOs::Windows, "C:/VC/Tools/MSVC/14.40")
    }

    #[test]
    fn test_compile_release() {
        let plt = windows();
        let op = BuildOperation::compile(&plt, "Source/zzzz_Unity.c", "Temp/unity-windows-x64.obj")
            .env_defines("PNSLR");
        let cmd = synthesize(&op);

        assert_eq!(
            cmd.program,
            Path::new("C:/VC/Tools/MSVC/14.40")
                .join("bin")
                .join("HostX64")
                .join("x64")
                .join("cl.exe")
        );
        assert_eq!(
            cmd.args,
            vec![
                "/Brepro",
                "/nologo",
                "/Wall",
                "/WX",
                "/O2",
                "/DNDEBUG",
                "/GL",
                "/c",
                "/DPNSLR_WINDOWS=1",
                "/DPNSLR_X64=1",
                "/DPNSLR_REL=1",
                "/std:c11",
                "Source/zzzz_Unity.c",
                "/FoTemp/unity-windows-x64.obj",
            ]
        );
    }

    #[test]
    fn test_compile_debug_emits_pdb() {
        let plt = windows();
        let op = BuildOperation::compile(&plt, "a.c", "Temp/a.obj").debug(true);
        let cmd = synthesize(&op);

        assert!(cmd.has_arg("/Zi"));
        assert!(cmd.has_arg("/D_DEBUG"));
        assert_eq!(cmd.args.last().unwrap(), "/FdTemp/a.pdb");
    }

    #[test]
    fn test_archive() {
        let plt = windows();
        let op = BuildOperation::static_link(
            &plt,
            vec!["intrinsics.obj".into(), "unity.obj".into()],
            "Libraries/panshilar-windows-x64.lib",
        );
        let cmd = synthesize(&op);

        assert!(cmd.program.ends_with("lib.exe"));
        assert_eq!(
            cmd.args,
            vec![
                "/Brepro",
                "/NOLOGO",
                "/OUT:Libraries/panshilar-windows-x64.lib",
                "intrinsics.obj",
                "unity.obj",
            ]
        );
    }

    #[test]
    fn test_exe_trailing_flags() {
        let plt = windows();
        let op = BuildOperation::executable(
            &plt,
            vec!["TestRunner.c".into(), "panshilar-windows-x64.lib".into()],
            "Binaries/TestRunner-windows-x64.exe",
        )
        .debug(true)
        .libs(vec!["iphlpapi".to_string(), "Ws2_32".to_string()]);
        let cmd = synthesize(&op);

        let tail: Vec<&str> = cmd.args.iter().rev().take(7).rev().map(|s| s.as_str()).collect();
        assert_eq!(
            tail,
            vec![
                "panshilar-windows-x64.lib",
                "/FeBinaries/TestRunner-windows-x64.exe",
                "iphlpapi.lib",
                "Ws2_32.lib",
                "/DEBUG",
                "/FdBinaries/TestRunner-windows-x64.pdb",
                "/FoBinaries/",
            ]
        );
        assert!(!cmd.has_arg("/c"));
    }

    #[test]
    fn test_exe_without_output_dir() {
        let plt = windows();
        let op = BuildOperation::executable(&plt, vec!["BindingsGenerator.c".into()], "BindingsGenerator.exe");
        let cmd = synthesize(&op);

        assert_eq!(cmd.args.last().map(|s| s.as_str()), Some("/FeBindingsGenerator.exe"));
        assert!(!cmd.args.iter().any(|a| a.starts_with("/Fo")));
    }
}
