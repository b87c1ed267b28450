//! Configuration file support for platbuild.
//!
//! Two optional locations are read:
//! - Global: `~/.platbuild/config.toml` - User-wide defaults
//! - Project: `Platbuild.toml` at the project root
//!
//! Project config takes precedence over global config, field by field.
//! Every field is optional; missing fields fall back to the layout the
//! library has always been built with.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::errors::BuildError;

/// Project config file name.
pub const PROJECT_CONFIG_NAME: &str = "Platbuild.toml";

pub const DEFAULT_LIBRARY_NAME: &str = "panshilar";
pub const DEFAULT_DEFINE_PREFIX: &str = "PNSLR";

/// platbuild configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,

    pub paths: PathsConfig,

    pub build: BuildConfig,
}

/// Library identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Base name of the static library (default `panshilar`)
    pub name: Option<String>,

    /// Prefix of the platform-identity defines (default `PNSLR`)
    pub define_prefix: Option<String>,
}

/// Project directories, relative to the project root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PathsConfig {
    pub source: Option<PathBuf>,
    pub bindings: Option<PathBuf>,
    pub libraries: Option<PathBuf>,
    pub binaries: Option<PathBuf>,
    pub temp: Option<PathBuf>,
    /// Directory holding `Intrinsics.c` and `Prebuilt/`
    pub intrinsics: Option<PathBuf>,
    pub test_runner: Option<PathBuf>,
    pub bindings_generator: Option<PathBuf>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Default number of platforms built in parallel (None = sequential)
    pub jobs: Option<usize>,

    /// Write `.vscode/c_cpp_properties.json` on every build (default true)
    pub emit_editor_config: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BuildError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| BuildError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("{:#}", anyhow::Error::from(e));
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        fn take<T>(slot: &mut Option<T>, other: Option<T>) {
            if other.is_some() {
                *slot = other;
            }
        }

        take(&mut self.project.name, other.project.name);
        take(&mut self.project.define_prefix, other.project.define_prefix);

        take(&mut self.paths.source, other.paths.source);
        take(&mut self.paths.bindings, other.paths.bindings);
        take(&mut self.paths.libraries, other.paths.libraries);
        take(&mut self.paths.binaries, other.paths.binaries);
        take(&mut self.paths.temp, other.paths.temp);
        take(&mut self.paths.intrinsics, other.paths.intrinsics);
        take(&mut self.paths.test_runner, other.paths.test_runner);
        take(&mut self.paths.bindings_generator, other.paths.bindings_generator);

        take(&mut self.build.jobs, other.build.jobs);
        take(&mut self.build.emit_editor_config, other.build.emit_editor_config);
    }

    pub fn library_name(&self) -> &str {
        self.project.name.as_deref().unwrap_or(DEFAULT_LIBRARY_NAME)
    }

    pub fn define_prefix(&self) -> &str {
        self.project
            .define_prefix
            .as_deref()
            .unwrap_or(DEFAULT_DEFINE_PREFIX)
    }

    pub fn emit_editor_config(&self) -> bool {
        self.build.emit_editor_config.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (Platbuild.toml)
/// 2. Global config (~/.platbuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    // Project config overrides global
    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global platbuild config directory (~/.platbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".platbuild"))
}

/// Get the global config path (~/.platbuild/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (`<root>/Platbuild.toml`).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_NAME)
}
