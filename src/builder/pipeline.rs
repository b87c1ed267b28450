//! Per-platform stage sequencing.
//!
//! Stages run in a fixed dependency order:
//!
//! ```text
//! intrinsics compile (optional)
//!   -> library compile -> library link
//!        -> test runner build (optional) -> test runner run (host only)
//!        -> bindings generator build (optional) -> bindings generator run (host only)
//! ```
//!
//! A stage whose dependency failed, or that was not requested, leaves no
//! outcome behind. The test and bindings branches only depend on the link.

use std::path::PathBuf;

use crate::builder::runner::ProcessRunner;
use crate::builder::toolchain::{synthesize, BuildOperation, CommandSpec};
use crate::core::layout::ProjectLayout;
use crate::core::platform::{Platform, TargetOs};
use crate::core::summary::PipelineRun;

/// Which optional stages were requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageOptions {
    pub rebuild_intrinsics: bool,
    pub run_tests: bool,
    pub regenerate_bindings: bool,
}

/// System libraries the test runner links against.
fn test_runner_libs(os: TargetOs) -> Vec<String> {
    match os {
        TargetOs::Windows => vec!["iphlpapi".to_string(), "Ws2_32".to_string()],
        TargetOs::Linux => vec!["pthread".to_string()],
        _ => Vec::new(),
    }
}

fn bindings_generator_libs(os: TargetOs) -> Vec<String> {
    match os {
        TargetOs::Windows => vec!["iphlpapi".to_string(), "Ws2_32".to_string()],
        _ => Vec::new(),
    }
}

/// Runs every requested stage of one platform.
pub struct BuildPipeline<'a> {
    layout: &'a ProjectLayout,
    runner: &'a ProcessRunner<'a>,
    options: StageOptions,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(layout: &'a ProjectLayout, runner: &'a ProcessRunner<'a>, options: StageOptions) -> Self {
        BuildPipeline {
            layout,
            runner,
            options,
        }
    }

    /// Run the pipeline for `plt`, stopping at the first failed stage.
    pub fn run(&self, plt: &Platform) -> PipelineRun {
        let mut run = PipelineRun::new(plt.tag);
        let layout = self.layout;

        if self.options.rebuild_intrinsics {
            let op = BuildOperation::compile(plt, layout.intrinsics_source(), layout.intrinsics_object(plt))
                .env_defines(layout.define_prefix.as_str());
            if !self.stage(&mut run, plt, "Intrinsics Compile", synthesize(&op)) {
                return run;
            }
        }

        let op = BuildOperation::compile(plt, layout.unity_source(), layout.library_object(plt))
            .env_defines(layout.define_prefix.as_str());
        if !self.stage(&mut run, plt, "Library Compile", synthesize(&op)) {
            return run;
        }

        let op = BuildOperation::static_link(
            plt,
            vec![layout.intrinsics_object(plt), layout.library_object(plt)],
            layout.static_library(plt),
        );
        if !self.stage(&mut run, plt, "Library Link", synthesize(&op)) {
            return run;
        }

        // Host tooling only makes sense on desktop targets
        if !plt.os().is_desktop() {
            return run;
        }

        if self.options.run_tests {
            self.tool(
                &mut run,
                plt,
                "Test Runner",
                layout.test_runner_source(),
                layout.test_runner_exe(plt),
                test_runner_libs(plt.os()),
            );
        }

        if self.options.regenerate_bindings {
            self.tool(
                &mut run,
                plt,
                "Bindings Generator",
                layout.bindings_generator_source(),
                layout.bindings_generator_exe(plt),
                bindings_generator_libs(plt.os()),
            );
        }

        run
    }

    /// Build a debug tool executable against the fresh library, then run
    /// it when the host can.
    fn tool(
        &self,
        run: &mut PipelineRun,
        plt: &Platform,
        label: &str,
        main: PathBuf,
        exe: PathBuf,
        libs: Vec<String>,
    ) {
        let op = BuildOperation::executable(plt, vec![main, self.layout.static_library(plt)], &exe)
            .debug(true)
            .env_defines(self.layout.define_prefix.as_str())
            .include_dirs(self.layout.tool_include_dirs())
            .libs(libs);

        let build = synthesize(&op);
        let style = build.style();

        let built = self.stage(run, plt, &format!("{} Build", label), build);
        if built && plt.can_run_on_host() {
            self.stage(run, plt, &format!("{} Run", label), CommandSpec::new(exe, style));
        }
    }

    fn stage(&self, run: &mut PipelineRun, plt: &Platform, stage: &str, cmd: CommandSpec) -> bool {
        let outcome = self.runner.execute(&cmd, &plt.stage_name(stage));
        run.record(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{Arch, HostOs};
    use crate::test_support::fixtures::{default_layout, platform};
    use crate::test_support::{CommandPattern, MockExecutor};
    use crate::util::shell::Shell;

    fn run_with(exec: &MockExecutor, plt: &Platform, options: StageOptions) -> PipelineRun {
        let shell = Shell::captured();
        let layout = default_layout();
        let runner = ProcessRunner::new(exec, &shell);
        BuildPipeline::new(&layout, &runner, options).run(plt)
    }

    #[test]
    fn test_default_stages() {
        let exec = MockExecutor::new();
        let plt = platform(TargetOs::Windows, Arch::X64, HostOs::Windows);

        let run = run_with(&exec, &plt, StageOptions::default());

        assert_eq!(run.names(), vec!["Windows-x64 Library Compile", "Windows-x64 Library Link"]);
        assert!(run.succeeded());
        assert_eq!(exec.calls().len(), 2);
    }

    #[test]
    fn test_all_stages_on_host() {
        let exec = MockExecutor::new();
        let plt = platform(TargetOs::Windows, Arch::X64, HostOs::Windows);
        let options = StageOptions {
            rebuild_intrinsics: true,
            run_tests: true,
            regenerate_bindings: true,
        };

        let run = run_with(&exec, &plt, options);

        assert_eq!(
            run.names(),
            vec![
                "Windows-x64 Intrinsics Compile",
                "Windows-x64 Library Compile",
                "Windows-x64 Library Link",
                "Windows-x64 Test Runner Build",
                "Windows-x64 Test Runner Run",
                "Windows-x64 Bindings Generator Build",
                "Windows-x64 Bindings Generator Run",
            ]
        );
        let calls = exec.calls();
        assert!(calls[6].ends_with("BindingsGenerator-windows-x64.exe"), "{}", calls[6]);
    }

    #[test]
    fn test_cross_targets_build_tools_without_running() {
        let exec = MockExecutor::new();
        let plt = platform(TargetOs::Linux, Arch::Arm64, HostOs::Windows);
        let options = StageOptions {
            run_tests: true,
            regenerate_bindings: true,
            ..StageOptions::default()
        };

        let run = run_with(&exec, &plt, options);

        assert_eq!(
            run.names(),
            vec![
                "Linux-ARM64 Library Compile",
                "Linux-ARM64 Library Link",
                "Linux-ARM64 Test Runner Build",
                "Linux-ARM64 Bindings Generator Build",
            ]
        );
        assert!(exec.calls()[2].ends_with("-lpthread"));
    }

    #[test]
    fn test_mobile_targets_skip_tools() {
        let exec = MockExecutor::new();
        let plt = platform(TargetOs::Android, Arch::Arm64, HostOs::Windows);
        let options = StageOptions {
            run_tests: true,
            regenerate_bindings: true,
            ..StageOptions::default()
        };

        let run = run_with(&exec, &plt, options);

        assert_eq!(run.outcomes.len(), 2);
    }

    #[test]
    fn test_compile_failure_stops_pipeline() {
        let exec = MockExecutor::new().fail_when(CommandPattern::Contains("zzzz_Unity.c".into()));
        let plt = platform(TargetOs::Windows, Arch::X64, HostOs::Windows);
        let options = StageOptions {
            run_tests: true,
            regenerate_bindings: true,
            ..StageOptions::default()
        };

        let run = run_with(&exec, &plt, options);

        assert_eq!(run.names(), vec!["Windows-x64 Library Compile"]);
        assert!(!run.succeeded());
    }

    #[test]
    fn test_intrinsics_failure_stops_pipeline() {
        let exec = MockExecutor::new().fail_when(CommandPattern::Contains("Intrinsics.c".into()));
        let plt = platform(TargetOs::Linux, Arch::X64, HostOs::Windows);
        let options = StageOptions {
            rebuild_intrinsics: true,
            ..StageOptions::default()
        };

        let run = run_with(&exec, &plt, options);

        assert_eq!(run.names(), vec!["Linux-x64 Intrinsics Compile"]);
    }

    #[test]
    fn test_link_failure_skips_test_build() {
        let exec = MockExecutor::new().fail_when(CommandPattern::Contains("/OUT:".into()));
        let plt = platform(TargetOs::Windows, Arch::X64, HostOs::Windows);
        let options = StageOptions {
            run_tests: true,
            ..StageOptions::default()
        };

        let run = run_with(&exec, &plt, options);

        assert_eq!(run.names(), vec!["Windows-x64 Library Compile", "Windows-x64 Library Link"]);
        assert!(!run.outcomes[1].succeeded);
    }

    #[test]
    fn test_tool_branches_are_independent() {
        let exec = MockExecutor::new().fail_when(CommandPattern::Contains("zzzz_TestRunner.c".into()));
        let plt = platform(TargetOs::Windows, Arch::X64, HostOs::Windows);
        let options = StageOptions {
            run_tests: true,
            regenerate_bindings: true,
            ..StageOptions::default()
        };

        let run = run_with(&exec, &plt, options);

        assert_eq!(
            run.names(),
            vec![
                "Windows-x64 Library Compile",
                "Windows-x64 Library Link",
                "Windows-x64 Test Runner Build",
                "Windows-x64 Bindings Generator Build",
                "Windows-x64 Bindings Generator Run",
            ]
        );
    }

    #[test]
    fn test_executables_link_the_library() {
        let exec = MockExecutor::new();
        let plt = platform(TargetOs::Windows, Arch::X64, HostOs::Windows);
        let options = StageOptions {
            run_tests: true,
            ..StageOptions::default()
        };

        run_with(&exec, &plt, options);

        let build = &exec.calls()[2];
        assert!(build.contains("panshilar-windows-x64.lib"), "{}", build);
        assert!(build.contains("iphlpapi.lib Ws2_32.lib /DEBUG"), "{}", build);
        assert!(build.contains("/DPNSLR_DBG=1"), "{}", build);
    }
}
