//! CLI definitions using clap.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use platbuild::core::platform::{HostOs, PlatformTag};
use platbuild::util::shell::Verbosity;

/// platbuild - Cross-platform build orchestrator for a native C library
#[derive(Parser)]
#[command(name = "platbuild")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Build flags when no subcommand is given
    #[command(flatten)]
    pub build: BuildArgs,
}

impl Cli {
    /// Verbosity of whichever command runs; only builds can be silenced.
    pub fn verbosity(&self) -> Verbosity {
        match &self.command {
            None => self.build.verbosity(),
            Some(Commands::Build(args)) => args.verbosity(),
            Some(_) => Verbosity::Normal,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the library for every available platform (default)
    Build(BuildArgs),

    /// Show discovered toolchains and the platform matrix
    Platforms(ProjectArgs),

    /// Write .vscode/c_cpp_properties.json for every valid platform
    EditorConfig(ProjectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where the project lives and which host rules apply.
#[derive(Args, Clone, Debug, Default)]
pub struct ProjectArgs {
    /// Project root (defaults to current directory)
    #[arg(long, env = "PLATBUILD_ROOT")]
    pub root: Option<PathBuf>,

    /// Host toolchain rules to apply (windows or macos; defaults to the running OS)
    #[arg(long)]
    pub host: Option<HostOs>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct BuildArgs {
    /// Recompile the prebuilt intrinsics object first
    #[arg(long)]
    pub rebuild_intrinsics: bool,

    /// Build (and on the host, run) the test runner
    #[arg(long)]
    pub tests: bool,

    /// Build (and on the host, run) the bindings generator
    #[arg(long)]
    pub rebind: bool,

    /// Suppress our own status lines
    #[arg(long)]
    pub silent: bool,

    /// Suppress all output, including compiler output
    #[arg(long)]
    pub very_silent: bool,

    /// Only build platforms native to the host
    #[arg(long)]
    pub host_only: bool,

    /// Build only this platform (repeatable, e.g. linux-arm64)
    #[arg(long = "platform", value_name = "TAG")]
    pub platforms: Vec<PlatformTag>,

    /// Print commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Number of platforms built in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    #[command(flatten)]
    pub project: ProjectArgs,
}

impl BuildArgs {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.silent, self.very_silent)
    }
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Single-dash switches accepted for compatibility with older scripts.
const LEGACY_SWITCHES: [&str; 6] = [
    "-rebuild-intrinsics",
    "-tests",
    "-rebind",
    "-silent",
    "-very-silent",
    "-host-only",
];

/// Rewrite legacy `-switch` and `+tag` tokens into their long forms.
///
/// The first element (program name) is left untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();

    for (i, arg) in args.into_iter().enumerate() {
        if i == 0 {
            out.push(arg);
            continue;
        }

        match arg.to_str() {
            Some(s) if LEGACY_SWITCHES.contains(&s) => out.push(format!("-{}", s).into()),
            Some(s) if s.len() > 1 && s.starts_with('+') => {
                out.push("--platform".into());
                out.push(s[1..].into());
            }
            _ => out.push(arg),
        }
    }

    out
}
