//! `.vscode/c_cpp_properties.json` generation.
//!
//! One configuration per valid platform, so the editor's language server
//! sees the same identity defines and cross-target flags as the build.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::toolchain::{dialect_for, editor_compiler_args};
use crate::core::language::Language;
use crate::core::platform::{Platform, TargetOs};

/// Format version understood by the C/C++ extension.
const PROPERTIES_VERSION: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CCppConfiguration {
    pub name: String,
    pub compiler_path: String,
    pub c_standard: String,
    pub cpp_standard: String,
    pub include_path: Vec<String>,
    pub defines: Vec<String>,
    pub compiler_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CCppProperties {
    pub version: u32,
    pub configurations: Vec<CCppConfiguration>,
}

/// Editor paths always use forward slashes.
fn editor_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn configuration(plt: &Platform, define_prefix: &str, vulkan_sdk: Option<&Path>) -> CCppConfiguration {
    let dialect = dialect_for(plt);
    let root = plt.root();

    let mut defines = vec![
        format!("{}_{}=1", define_prefix, plt.os().define_suffix()),
        format!("{}_{}=1", define_prefix, plt.arch().define_suffix()),
        format!("{}_DBG=1", define_prefix),
    ];
    defines.extend(
        dialect
            .extra_env_defines()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value)),
    );

    let mut include_path: Vec<PathBuf> = Vec::new();
    match plt.os() {
        TargetOs::Android => {
            include_path.push(
                root.join("toolchains")
                    .join("llvm")
                    .join("prebuilt")
                    .join(plt.host.ndk_host_tag())
                    .join("sysroot")
                    .join("usr")
                    .join("include"),
            );
            include_path.push(root.join("sources").join("android").join("native_app_glue"));
        }
        TargetOs::Linux => include_path.push(root.join("usr").join("include")),
        _ => {}
    }
    if let Some(sdk) = vulkan_sdk {
        include_path.push(sdk.join("Include"));
    }

    CCppConfiguration {
        name: plt.tag.pretty(),
        compiler_path: editor_path(&dialect.compiler_path(Language::C)),
        c_standard: Language::C.standard().to_string(),
        cpp_standard: Language::Cxx.standard().to_string(),
        include_path: include_path.iter().map(|p| editor_path(p)).collect(),
        defines,
        compiler_args: editor_compiler_args(plt),
    }
}

/// Build the properties document for `platforms`.
pub fn editor_properties(platforms: &[Platform], define_prefix: &str, vulkan_sdk: Option<&Path>) -> CCppProperties {
    CCppProperties {
        version: PROPERTIES_VERSION,
        configurations: platforms
            .iter()
            .map(|plt| configuration(plt, define_prefix, vulkan_sdk))
            .collect(),
    }
}

/// Path of the properties file under `root`.
pub fn editor_config_path(root: &Path) -> PathBuf {
    root.join(".vscode").join("c_cpp_properties.json")
}

/// Write the properties file under `root` and return its path.
pub fn write_editor_config(
    root: &Path,
    platforms: &[Platform],
    define_prefix: &str,
    vulkan_sdk: Option<&Path>,
) -> Result<PathBuf> {
    let path = editor_config_path(root);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let props = editor_properties(platforms, define_prefix, vulkan_sdk);
    let json = serde_json::to_string_pretty(&props)?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write editor config: {}", path.display()))?;

    tracing::debug!("wrote {}", path.display());
    Ok(path)
}
