//! `platbuild build` command (also the default with no subcommand)

use anyhow::Result;

use platbuild::builder::{DryRunExecutor, Executor, ProcessEnv, StageOptions, SystemExecutor};
use platbuild::ops::matrix_build::{build, BuildOptions};
use platbuild::util::shell::{ColorChoice, Shell};

use crate::cli::BuildArgs;
use crate::commands::{load_project_config, project_root};

pub fn execute(args: BuildArgs, color: ColorChoice) -> Result<i32> {
    let root = project_root(args.project.root.clone())?;
    let config = load_project_config(&root);
    let shell = Shell::new(args.verbosity(), color);

    let opts = BuildOptions {
        root,
        host: args.project.host,
        stages: StageOptions {
            rebuild_intrinsics: args.rebuild_intrinsics,
            run_tests: args.tests,
            regenerate_bindings: args.rebind,
        },
        host_only: args.host_only,
        platforms: args.platforms,
        dry_run: args.dry_run,
        jobs: args.jobs,
    };

    let executor: &dyn Executor = if opts.dry_run {
        &DryRunExecutor
    } else {
        &SystemExecutor
    };

    let result = build(&opts, &config, &ProcessEnv, executor, &shell)?;
    tracing::debug!("built {} platform(s)", result.platforms.len());

    Ok(result.summary.report(&shell))
}
