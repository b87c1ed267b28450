//! `platbuild editor-config` command

use anyhow::Result;

use platbuild::builder::catalog::expand;
use platbuild::builder::toolchain::discover;
use platbuild::builder::ProcessEnv;
use platbuild::core::summary::RunSummary;
use platbuild::ops::editor_config::write_editor_config;
use platbuild::ops::matrix_build::resolve_host;
use platbuild::util::shell::{ColorChoice, Shell, Verbosity};

use crate::cli::ProjectArgs;
use crate::commands::{load_project_config, project_root};

pub fn execute(args: ProjectArgs, color: ColorChoice) -> Result<i32> {
    let root = project_root(args.root)?;
    let config = load_project_config(&root);
    let host = resolve_host(args.host)?;
    let shell = Shell::new(Verbosity::Normal, color);

    let mut summary = RunSummary::new();
    let toolchains = discover(&ProcessEnv, host, &shell, &mut summary);
    let platforms = expand(&toolchains, false);

    let path = write_editor_config(&root, &platforms, config.define_prefix(), toolchains.vulkan_sdk())?;
    shell.info(format!(
        "Wrote {} configuration(s) to {}",
        platforms.len(),
        path.display()
    ));

    Ok(summary.exit_code())
}
