//! Stage outcomes and the run-wide ledger.

use crate::core::platform::PlatformTag;
use crate::util::shell::Shell;

/// The result of one executed external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    /// Human-readable label, e.g. `Linux-ARM64 Library Link`.
    pub name: String,
    pub succeeded: bool,
}

impl StageOutcome {
    pub fn success(name: impl Into<String>) -> Self {
        StageOutcome {
            name: name.into(),
            succeeded: true,
        }
    }

    pub fn failure(name: impl Into<String>) -> Self {
        StageOutcome {
            name: name.into(),
            succeeded: false,
        }
    }
}

/// Outcomes of one platform's pipeline, in attempt order.
///
/// Skipped stages never appear here.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub platform: PlatformTag,
    pub outcomes: Vec<StageOutcome>,
}

impl PipelineRun {
    pub fn new(platform: PlatformTag) -> Self {
        PipelineRun {
            platform,
            outcomes: Vec::new(),
        }
    }

    /// Record an outcome and hand back whether it succeeded.
    pub fn record(&mut self, outcome: StageOutcome) -> bool {
        let ok = outcome.succeeded;
        self.outcomes.push(outcome);
        ok
    }

    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.succeeded)
    }

    pub fn names(&self) -> Vec<&str> {
        self.outcomes.iter().map(|o| o.name.as_str()).collect()
    }
}

/// Append-only ledger of every outcome in the run.
///
/// Entry order is attempt order; the succeeded and failed views keep it.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    entries: Vec<StageOutcome>,
}

impl RunSummary {
    pub fn new() -> Self {
        RunSummary::default()
    }

    pub fn record(&mut self, outcome: StageOutcome) {
        self.entries.push(outcome);
    }

    /// Fold a finished pipeline into the ledger.
    pub fn absorb(&mut self, run: PipelineRun) {
        self.entries.extend(run.outcomes);
    }

    pub fn entries(&self) -> &[StageOutcome] {
        &self.entries
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|o| o.succeeded)
            .map(|o| o.name.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|o| !o.succeeded)
            .map(|o| o.name.as_str())
    }

    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|o| !o.succeeded)
    }

    /// 0 when nothing failed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }

    /// Print the succeeded and failed views and return the exit code.
    pub fn report(&self, shell: &Shell) -> i32 {
        shell.section_start();

        let succeeded: Vec<&str> = self.succeeded().collect();
        if !succeeded.is_empty() {
            shell.info("Succeeded processes:");
            for name in succeeded {
                shell.item(name);
            }
        }

        let failed: Vec<&str> = self.failed().collect();
        if !failed.is_empty() {
            shell.error("Failed processes:");
            for name in failed {
                shell.item(name);
            }
            shell.failure("One or more processes failed. Please check the output above for details.");
        } else {
            shell.success("All processes completed successfully!");
        }

        shell.section_end();
        self.exit_code()
    }
}
