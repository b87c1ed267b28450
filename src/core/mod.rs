//! Core data structures for platbuild.
//!
//! This module contains the foundational types used throughout platbuild:
//! - Platform identity (target OS, architecture, host)
//! - Discovered toolchains
//! - Project layout and artifact naming
//! - Stage outcomes and the run summary

pub mod language;
pub mod layout;
pub mod platform;
pub mod summary;
pub mod toolchain;

pub use language::Language;
pub use layout::ProjectLayout;
pub use platform::{Arch, HostOs, Platform, PlatformTag, TargetOs};
pub use summary::{PipelineRun, RunSummary, StageOutcome};
pub use toolchain::{Toolchain, Toolchains};
