//! Test utilities and mocks for platbuild unit tests.
//!
//! This module provides mock implementations for the two boundaries that
//! are difficult to test in isolation: the process environment that
//! toolchain discovery reads, and the external compilers the runner spawns.
//!
//! # Example
//!
//! ```rust,ignore
//! use platbuild::test_support::{CommandPattern, MockEnv, MockExecutor};
//!
//! #[test]
//! fn test_example() {
//!     let env = MockEnv::new()
//!         .set("WINDOWS_TOOLCHAIN_FOUND", "1")
//!         .set("WINDOWS_TOOLCHAIN", "C:/VC");
//!
//!     let exec = MockExecutor::new().fail_when(CommandPattern::Contains("/OUT:".into()));
//!
//!     // Use mocks in tests...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::builder::runner::Executor;
use crate::builder::toolchain::{CommandSpec, EnvSource};
use crate::util::process::ChildOutput;

// Re-export fixtures for convenience
pub use fixtures::*;

/// In-memory environment variables.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: HashMap<String, String>,
}

impl MockEnv {
    pub fn new() -> Self {
        MockEnv::default()
    }

    /// Set a variable.
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvSource for MockEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Pattern for matching commands in MockExecutor.
///
/// Patterns are matched against the displayed command line
/// (program followed by arguments, space separated).
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// Mock process executor for testing command execution.
///
/// Every command succeeds unless it matches a failure pattern. All calls
/// are recorded in order.
#[derive(Debug, Default)]
pub struct MockExecutor {
    failing: Vec<CommandPattern>,
    unspawnable: Vec<CommandPattern>,
    calls: Mutex<Vec<(String, ChildOutput)>>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Matching commands exit non-zero.
    pub fn fail_when(mut self, pattern: CommandPattern) -> Self {
        self.failing.push(pattern);
        self
    }

    /// Matching commands cannot be started.
    pub fn spawn_error_when(mut self, pattern: CommandPattern) -> Self {
        self.unspawnable.push(pattern);
        self
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> Vec<String> {
        self.recorded().into_iter().map(|(cmd, _)| cmd).collect()
    }

    /// How each call's output was routed.
    pub fn outputs(&self) -> Vec<ChildOutput> {
        self.recorded().into_iter().map(|(_, out)| out).collect()
    }

    fn recorded(&self) -> Vec<(String, ChildOutput)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Executor for MockExecutor {
    fn status(&self, cmd: &CommandSpec, output: ChildOutput) -> Result<bool> {
        let full_cmd = cmd.to_string();

        if let Ok(mut calls) = self.calls.lock() {
            calls.push((full_cmd.clone(), output));
        }

        if self.unspawnable.iter().any(|p| p.matches(&full_cmd)) {
            bail!("failed to execute `{}`", cmd.program.display());
        }

        Ok(!self.failing.iter().any(|p| p.matches(&full_cmd)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::FlagStyle;

    #[test]
    fn test_command_pattern() {
        assert!(CommandPattern::Exact("ar rcs".into()).matches("ar rcs"));
        assert!(CommandPattern::StartsWith("ar".into()).matches("ar rcs"));
        assert!(CommandPattern::Contains("rcs".into()).matches("ar rcs x.a"));
        assert!(CommandPattern::Any.matches(""));
        assert!(!CommandPattern::Exact("ar".into()).matches("ar rcs"));
    }

    #[test]
    fn test_mock_executor_records_calls() {
        let exec = MockExecutor::new().fail_when(CommandPattern::StartsWith("lib.exe".into()));

        let ok = CommandSpec::new("cl.exe", FlagStyle::Msvc).arg("/c");
        let bad = CommandSpec::new("lib.exe", FlagStyle::Msvc).arg("/NOLOGO");

        assert!(exec.status(&ok, ChildOutput::Inherit).unwrap());
        assert!(!exec.status(&bad, ChildOutput::Null).unwrap());
        assert_eq!(exec.calls(), vec!["cl.exe /c", "lib.exe /NOLOGO"]);
        assert_eq!(exec.outputs(), vec![ChildOutput::Inherit, ChildOutput::Null]);
    }

    #[test]
    fn test_mock_env() {
        let env = MockEnv::new().set("A", "1");
        assert_eq!(env.var("A").as_deref(), Some("1"));
        assert!(env.var("B").is_none());
    }
}
