//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use platbuild::util::config::{global_config_path, load_config, project_config_path, Config};

pub mod build;
pub mod completions;
pub mod editor_config;
pub mod platforms;

/// Project root from `--root`, else the current directory.
pub fn project_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

/// Global config merged with the project's `Platbuild.toml`.
pub fn load_project_config(root: &Path) -> Config {
    load_config(global_config_path().as_deref(), &project_config_path(root))
}
