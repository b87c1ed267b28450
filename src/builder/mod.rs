//! Native library build orchestration.
//!
//! This module turns discovered toolchains into platforms, synthesizes
//! compiler and archiver commands for them, and runs the per-platform
//! stage pipelines.

pub mod catalog;
pub mod errors;
pub mod pipeline;
pub mod runner;
pub mod toolchain;

pub use errors::BuildError;
pub use pipeline::{BuildPipeline, StageOptions};
pub use runner::{DryRunExecutor, Executor, ProcessRunner, SystemExecutor};
pub use toolchain::{
    discover, synthesize, BuildOperation, CommandSpec, EnvSource, FlagStyle, OperationKind,
    ProcessEnv,
};
