//! platbuild CLI - cross-platform build orchestrator for a native C library

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{normalize_args, Cli, Commands};
use platbuild::util::shell::ColorChoice;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI, accepting the legacy `-switch` and `+platform` forms
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    // Set up logging; it follows the same silence and colour rules as the shell
    let filter = EnvFilter::new(cli.verbosity().log_directive(cli.verbose));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(color.enabled())
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        None => commands::build::execute(cli.build, color),
        Some(Commands::Build(args)) => commands::build::execute(args, color),
        Some(Commands::Platforms(args)) => commands::platforms::execute(args, color),
        Some(Commands::EditorConfig(args)) => commands::editor_config::execute(args, color),
        Some(Commands::Completions(args)) => commands::completions::execute(args),
    }
}
