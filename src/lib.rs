//! platbuild - cross-platform build orchestrator for a native C library
//!
//! This crate provides the core library functionality for platbuild:
//! toolchain discovery, platform expansion, command synthesis and the
//! per-platform build pipelines.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for platbuild unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for the process
/// environment and external command execution.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Platform, PlatformTag, RunSummary};
pub use builder::BuildError;
