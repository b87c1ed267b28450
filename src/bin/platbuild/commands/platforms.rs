//! `platbuild platforms` command
//!
//! Shows what toolchain discovery found and the platform matrix it expands
//! to, with a quick check that each compiler driver is actually there.

use std::path::Path;

use anyhow::Result;

use platbuild::builder::catalog::expand;
use platbuild::builder::toolchain::{dialect_for, discover};
use platbuild::builder::ProcessEnv;
use platbuild::core::language::Language;
use platbuild::core::summary::RunSummary;
use platbuild::ops::matrix_build::resolve_host;
use platbuild::util::process::find_executable;
use platbuild::util::shell::{ColorChoice, Shell, Verbosity};

use crate::cli::ProjectArgs;

/// Absolute paths are checked on disk, bare names through `PATH`.
fn compiler_present(path: &Path) -> bool {
    if path.is_absolute() {
        path.exists()
    } else {
        find_executable(path).is_some()
    }
}

pub fn execute(args: ProjectArgs, color: ColorChoice) -> Result<i32> {
    let host = resolve_host(args.host)?;
    let shell = Shell::new(Verbosity::Normal, color);

    let mut summary = RunSummary::new();
    let toolchains = discover(&ProcessEnv, host, &shell, &mut summary);

    println!("Host: {}", host);
    println!();
    println!("Toolchains:");
    for toolchain in toolchains.iter() {
        if toolchain.found {
            println!("  {:<22} {}", toolchain.display_name, toolchain.root.display());
        } else {
            println!("  {:<22} (not found)", toolchain.display_name);
        }
    }
    if let Some(tools) = &toolchains.build_tools {
        println!("  {:<22} {}", "Build tools", tools.display());
    }
    if let Some(sdk) = toolchains.vulkan_sdk() {
        println!("  {:<22} {}", "Vulkan SDK", sdk.display());
    }

    let platforms = expand(&toolchains, false);
    println!();
    println!("Platforms:");
    if platforms.is_empty() {
        println!("  (none)");
    }

    let mut missing = 0;
    for plt in &platforms {
        let compiler = dialect_for(plt).compiler_path(Language::C);
        let present = compiler_present(&compiler);
        if !present {
            missing += 1;
        }

        let scope = if plt.is_host_buildable() { "host" } else { "cross" };
        let mark = if present { "ok" } else { "missing" };
        println!(
            "  {:<22} {:<6} {:<8} {}",
            plt.tag.pretty(),
            scope,
            mark,
            compiler.display()
        );
    }

    let host_only: Vec<String> = expand(&toolchains, true)
        .iter()
        .map(|plt| plt.tag.to_string())
        .collect();
    println!();
    println!("Built with --host-only: {}", host_only.join(", "));

    if missing > 0 {
        shell.warn(format!("{} compiler driver(s) could not be located.", missing));
    }

    Ok(summary.exit_code())
}
