//! On-disk layout of a project and its per-platform artifacts.

use std::path::{Path, PathBuf};

use crate::core::platform::Platform;
use crate::util::config::Config;

/// Resolved project directories and entry-point sources.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub bindings_dir: PathBuf,
    pub libraries_dir: PathBuf,
    pub binaries_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub intrinsics_dir: PathBuf,
    pub test_runner_dir: PathBuf,
    pub bindings_generator_dir: PathBuf,
    /// Static library base name.
    pub library_name: String,
    pub define_prefix: String,
}

impl ProjectLayout {
    /// Resolve every directory against `root`, falling back to defaults.
    pub fn resolve(root: impl Into<PathBuf>, config: &Config) -> Self {
        let root = root.into();
        let paths = &config.paths;
        let dir = |configured: &Option<PathBuf>, default: &str| {
            root.join(configured.as_deref().unwrap_or_else(|| Path::new(default)))
        };

        let source_dir = dir(&paths.source, "Source");
        let intrinsics_dir = match &paths.intrinsics {
            Some(p) => root.join(p),
            None => source_dir.join("Dependencies").join("PNSLR_Intrinsics"),
        };

        ProjectLayout {
            bindings_dir: dir(&paths.bindings, "Bindings"),
            libraries_dir: dir(&paths.libraries, "Libraries"),
            binaries_dir: dir(&paths.binaries, "Binaries"),
            temp_dir: dir(&paths.temp, "Temp"),
            test_runner_dir: dir(&paths.test_runner, "Tools/TestRunner"),
            bindings_generator_dir: dir(&paths.bindings_generator, "Tools/BindGen"),
            intrinsics_dir,
            source_dir,
            library_name: config.library_name().to_string(),
            define_prefix: config.define_prefix().to_string(),
            root,
        }
    }

    pub fn unity_source(&self) -> PathBuf {
        self.source_dir.join("zzzz_Unity.c")
    }

    pub fn intrinsics_source(&self) -> PathBuf {
        self.intrinsics_dir.join("Intrinsics.c")
    }

    pub fn prebuilt_dir(&self) -> PathBuf {
        self.intrinsics_dir.join("Prebuilt")
    }

    pub fn test_runner_source(&self) -> PathBuf {
        self.test_runner_dir.join("zzzz_TestRunner.c")
    }

    pub fn bindings_generator_source(&self) -> PathBuf {
        self.bindings_generator_dir.join("BindingsGenerator.c")
    }

    pub fn intrinsics_object(&self, plt: &Platform) -> PathBuf {
        self.prebuilt_dir().join(plt.object_file_name("intrinsics"))
    }

    pub fn library_object(&self, plt: &Platform) -> PathBuf {
        self.temp_dir.join(plt.object_file_name("unity"))
    }

    pub fn static_library(&self, plt: &Platform) -> PathBuf {
        self.libraries_dir
            .join(plt.static_lib_file_name(&self.library_name))
    }

    pub fn test_runner_exe(&self, plt: &Platform) -> PathBuf {
        self.binaries_dir.join(plt.exe_file_name("TestRunner"))
    }

    pub fn bindings_generator_exe(&self, plt: &Platform) -> PathBuf {
        self.binaries_dir.join(plt.exe_file_name("BindingsGenerator"))
    }

    /// Directories the stages write into.
    pub fn output_dirs(&self) -> [PathBuf; 4] {
        [
            self.temp_dir.clone(),
            self.libraries_dir.clone(),
            self.binaries_dir.clone(),
            self.prebuilt_dir(),
        ]
    }

    /// Include directories for the tool executables.
    pub fn tool_include_dirs(&self) -> Vec<PathBuf> {
        vec![self.source_dir.clone(), self.bindings_dir.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{Arch, HostOs, TargetOs};
    use crate::test_support::fixtures::platform;

    #[test]
    fn test_default_layout() {
        let layout = ProjectLayout::resolve("/proj", &Config::default());

        assert_eq!(layout.unity_source(), Path::new("/proj/Source/zzzz_Unity.c"));
        assert_eq!(
            layout.intrinsics_source(),
            Path::new("/proj/Source/Dependencies/PNSLR_Intrinsics/Intrinsics.c")
        );
        assert_eq!(
            layout.test_runner_source(),
            Path::new("/proj/Tools/TestRunner/zzzz_TestRunner.c")
        );
        assert_eq!(
            layout.bindings_generator_source(),
            Path::new("/proj/Tools/BindGen/BindingsGenerator.c")
        );
        assert_eq!(layout.library_name, "panshilar");
        assert_eq!(layout.define_prefix, "PNSLR");
    }

    #[test]
    fn test_artifact_paths() {
        let layout = ProjectLayout::resolve("/proj", &Config::default());
        let linux = platform(TargetOs::Linux, Arch::X64, HostOs::Windows);

        assert_eq!(
            layout.intrinsics_object(&linux),
            Path::new("/proj/Source/Dependencies/PNSLR_Intrinsics/Prebuilt/intrinsics-linux-x64.o")
        );
        assert_eq!(layout.library_object(&linux), Path::new("/proj/Temp/unity-linux-x64.o"));
        assert_eq!(
            layout.static_library(&linux),
            Path::new("/proj/Libraries/libpanshilar-linux-x64.a")
        );
        assert_eq!(
            layout.test_runner_exe(&linux),
            Path::new("/proj/Binaries/TestRunner-linux-x64")
        );
    }

    #[test]
    fn test_configured_paths() {
        let mut config = Config::default();
        config.project.name = Some("core".to_string());
        config.paths.libraries = Some(PathBuf::from("out/lib"));
        config.paths.intrinsics = Some(PathBuf::from("vendor/intrinsics"));

        let layout = ProjectLayout::resolve("/proj", &config);
        let win = platform(TargetOs::Windows, Arch::X64, HostOs::Windows);

        assert_eq!(layout.static_library(&win), Path::new("/proj/out/lib/core-windows-x64.lib"));
        assert_eq!(layout.prebuilt_dir(), Path::new("/proj/vendor/intrinsics/Prebuilt"));
    }
}
