//! Implementation of `platbuild build`.
//!
//! Discovers toolchains, expands them into the platform matrix, runs one
//! pipeline per platform and folds every outcome into a single summary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::builder::catalog::{expand, filter_by_tags};
use crate::builder::pipeline::{BuildPipeline, StageOptions};
use crate::builder::runner::{Executor, ProcessRunner};
use crate::builder::toolchain::{discover, EnvSource};
use crate::core::layout::ProjectLayout;
use crate::core::platform::{HostOs, Platform, PlatformTag};
use crate::core::summary::{PipelineRun, RunSummary};
use crate::ops::combined_tests::write_combined_tests;
use crate::ops::editor_config::write_editor_config;
use crate::util::config::Config;
use crate::util::shell::Shell;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Project root
    pub root: PathBuf,

    /// Host override (None = the running OS)
    pub host: Option<HostOs>,

    /// Optional stages
    pub stages: StageOptions,

    /// Only build platforms native to the host
    pub host_only: bool,

    /// Requested platforms (empty = every available platform)
    pub platforms: Vec<PlatformTag>,

    /// Skip every filesystem write; commands are still synthesized
    pub dry_run: bool,

    /// Number of platforms built in parallel
    pub jobs: Option<usize>,
}

/// Everything a finished build run produced.
#[derive(Debug)]
pub struct BuildResult {
    /// Platforms that were built, in order
    pub platforms: Vec<PlatformTag>,
    pub summary: RunSummary,
}

/// Resolve the host, honoring an explicit override.
pub fn resolve_host(host: Option<HostOs>) -> Result<HostOs> {
    match host {
        Some(host) => Ok(host),
        None => Ok(HostOs::current()?),
    }
}

/// Run the whole build matrix.
///
/// Only an unsupported host or a filesystem error preparing the run is an
/// `Err`; stage failures are recorded in the returned summary.
pub fn build(
    opts: &BuildOptions,
    config: &Config,
    env: &dyn EnvSource,
    executor: &dyn Executor,
    shell: &Shell,
) -> Result<BuildResult> {
    let host = resolve_host(opts.host)?;
    let layout = ProjectLayout::resolve(&opts.root, config);
    tracing::debug!("host: {}, root: {}", host, layout.root.display());

    let mut summary = RunSummary::new();
    let toolchains = discover(env, host, shell, &mut summary);

    if config.emit_editor_config() && !opts.dry_run {
        let valid = expand(&toolchains, false);
        write_editor_config(&layout.root, &valid, &layout.define_prefix, toolchains.vulkan_sdk())?;
    }

    let platforms = filter_by_tags(expand(&toolchains, opts.host_only), &opts.platforms, shell);
    if platforms.is_empty() {
        shell.warn("No platforms to build.");
    }

    if !opts.dry_run {
        if opts.stages.run_tests {
            write_combined_tests(&layout.test_runner_dir, &layout.define_prefix)?;
        }

        for dir in layout.output_dirs() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        }
    }

    let runner = ProcessRunner::new(executor, shell);
    let pipeline = BuildPipeline::new(&layout, &runner, opts.stages);
    let jobs = opts.jobs.or(config.build.jobs).unwrap_or(1);

    for run in run_pipelines(&pipeline, &platforms, jobs)? {
        summary.absorb(run);
    }

    Ok(BuildResult {
        platforms: platforms.iter().map(|p| p.tag).collect(),
        summary,
    })
}

/// Run every pipeline, returning the runs in platform order.
fn run_pipelines(pipeline: &BuildPipeline<'_>, platforms: &[Platform], jobs: usize) -> Result<Vec<PipelineRun>> {
    if jobs <= 1 || platforms.len() <= 1 {
        return Ok(platforms.iter().map(|plt| pipeline.run(plt)).collect());
    }

    tracing::info!("Building {} platforms with {} jobs", platforms.len(), jobs);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("failed to start worker pool")?;

    // collect() on an indexed parallel iterator keeps input order
    Ok(pool.install(|| platforms.par_iter().map(|plt| pipeline.run(plt)).collect()))
}
