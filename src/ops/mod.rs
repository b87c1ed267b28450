//! High-level operations.
//!
//! This module contains the implementation of platbuild commands.

pub mod editor_config;
pub mod matrix_build;

pub use combined_tests::{collect_tests, write_combined_tests, COMBINED_TESTS_FILE};
pub use editor_config::{editor_config_path, editor_properties, write_editor_config};
pub use matrix_build::{build, resolve_host, BuildOptions, BuildResult};
