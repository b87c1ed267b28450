//! External command execution with status lines.

use anyhow::Result;
use tracing::debug;

use crate::builder::toolchain::CommandSpec;
use crate::core::summary::StageOutcome;
use crate::util::process::{ChildOutput, ProcessBuilder};
use crate::util::shell::Shell;

/// Spawns a synthesized command and waits for it.
///
/// `Ok(true)` means exit code zero; `Err` means the process could not be
/// started at all.
pub trait Executor: Send + Sync {
    fn status(&self, cmd: &CommandSpec, output: ChildOutput) -> Result<bool>;
}

/// Runs commands for real.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn status(&self, cmd: &CommandSpec, output: ChildOutput) -> Result<bool> {
        let process = ProcessBuilder::new(&cmd.program)
            .args(&cmd.args)
            .child_output(output);
        debug!("spawning `{}`", process.display_command());

        let status = process.status()?;
        Ok(status.success())
    }
}

/// Treats every command as successful without spawning it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

impl Executor for DryRunExecutor {
    fn status(&self, cmd: &CommandSpec, _output: ChildOutput) -> Result<bool> {
        debug!("dry run: {}", cmd);
        Ok(true)
    }
}

/// Runs one named stage and turns its exit code into a [`StageOutcome`].
pub struct ProcessRunner<'a> {
    executor: &'a dyn Executor,
    shell: &'a Shell,
}

impl<'a> ProcessRunner<'a> {
    pub fn new(executor: &'a dyn Executor, shell: &'a Shell) -> Self {
        ProcessRunner { executor, shell }
    }

    /// Run `cmd` to completion. There is no retry and no timeout.
    pub fn execute(&self, cmd: &CommandSpec, name: &str) -> StageOutcome {
        let shell = self.shell;
        shell.section_start();
        shell.info(format!("Running: {}", name));
        shell.debug(format!("Command: {}", cmd));

        let output = if shell.verbosity().shows_child_output() {
            ChildOutput::Inherit
        } else {
            ChildOutput::Null
        };

        let succeeded = match self.executor.status(cmd, output) {
            Ok(ok) => ok,
            Err(e) => {
                shell.error(format!("{:#}", e));
                false
            }
        };

        if succeeded {
            shell.success(format!("Completed successfully: {}", name));
        } else {
            shell.failure(format!("Failed to complete: {}", name));
        }
        shell.section_end();

        if succeeded {
            StageOutcome::success(name)
        } else {
            StageOutcome::failure(name)
        }
    }
}
