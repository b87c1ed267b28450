//! Typed failures of the orchestrator.
//!
//! Per-toolchain and per-stage problems are not errors; they are ledger
//! entries. Only conditions that stop the run before a report exists, or
//! that reject user input, surface here.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unsupported host platform: {0} (toolchain discovery needs a Windows or macOS host)")]
    UnsupportedHost(String),

    #[error("unknown platform tag `{0}`; expected one of windows-x64, osx-arm64, linux-x64, linux-arm64, android-x64, android-arm64, ios-arm64, iossimulator-arm64")]
    UnknownPlatformTag(String),

    #[error("failed to read config file: {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
