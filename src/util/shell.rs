//! Centralized console output for build runs.
//!
//! The Shell owns the three-level verbosity of the orchestrator and the
//! bracketed status lines (`[INFO]`, `[SUCCESS]`, ...) printed around each
//! external command. Child process output never passes through here; the
//! runner decides whether it is inherited or discarded.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Our own status lines plus child output.
    #[default]
    Normal,
    /// `-silent`: child output only.
    Silent,
    /// `-very-silent`: nothing, child output goes to a null sink.
    VerySilent,
}

impl Verbosity {
    /// Pick the verbosity from the two CLI switches; `very_silent` wins.
    pub fn from_flags(silent: bool, very_silent: bool) -> Self {
        if very_silent {
            Verbosity::VerySilent
        } else if silent {
            Verbosity::Silent
        } else {
            Verbosity::Normal
        }
    }

    /// `tracing` filter directive for this verbosity.
    ///
    /// Very-silent turns logging off entirely; silent keeps only warnings
    /// and errors, even with `--verbose`.
    pub fn log_directive(&self, verbose: bool) -> &'static str {
        match self {
            Verbosity::VerySilent => "platbuild=off",
            Verbosity::Silent => "platbuild=warn",
            Verbosity::Normal if verbose => "platbuild=debug",
            Verbosity::Normal => "platbuild=info",
        }
    }

    /// Whether child processes keep their stdout/stderr.
    pub fn shows_child_output(&self) -> bool {
        !matches!(self, Verbosity::VerySilent)
    }
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl ColorChoice {
    /// Resolve `Auto` against whether stdout is a terminal.
    pub fn enabled(&self) -> bool {
        match self {
            ColorChoice::Auto => io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status tags for bracketed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Debug,
    Info,
    Warning,
    Error,
    Success,
    Failure,
}

impl Status {
    /// Bracketed label padded so messages line up.
    fn label(&self) -> &'static str {
        match self {
            Status::Debug => "[DEBUG]:   ",
            Status::Info => "[INFO]:    ",
            Status::Warning => "[WARNING]: ",
            Status::Error => "[ERROR]:   ",
            Status::Success => "[SUCCESS]: ",
            Status::Failure => "[FAILURE]: ",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Debug => "\x1b[1m",
            Status::Info => "\x1b[1;36m",
            Status::Warning => "\x1b[1;33m",
            Status::Error | Status::Failure => "\x1b[1;31m",
            Status::Success => "\x1b[1;32m",
        }
    }
}

const SECTION_RULE_WIDTH: usize = 80;

#[derive(Debug)]
enum Sink {
    Stdout,
    Captured(Mutex<Vec<String>>),
}

/// Console writer shared by every component of a run.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    sink: Sink,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        Shell {
            verbosity,
            use_color: color.enabled(),
            sink: Sink::Stdout,
        }
    }

    /// A colorless shell that records lines instead of printing them.
    pub fn captured() -> Self {
        Shell::captured_with(Verbosity::Normal)
    }

    pub fn captured_with(verbosity: Verbosity) -> Self {
        Shell {
            verbosity,
            use_color: false,
            sink: Sink::Captured(Mutex::new(Vec::new())),
        }
    }

    /// Everything written to a captured shell, one line per entry.
    pub fn captured_output(&self) -> String {
        match &self.sink {
            Sink::Captured(lines) => lines
                .lock()
                .map(|lines| lines.join("\n"))
                .unwrap_or_default(),
            Sink::Stdout => String::new(),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Our own lines are printed only at normal verbosity.
    pub fn is_quiet(&self) -> bool {
        self.verbosity != Verbosity::Normal
    }

    fn write_line(&self, line: &str) {
        if self.is_quiet() {
            return;
        }

        match &self.sink {
            Sink::Stdout => {
                let mut out = io::stdout().lock();
                let _ = writeln!(out, "{}", line);
                let _ = out.flush();
            }
            Sink::Captured(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line.to_string());
                }
            }
        }
    }

    /// Print a bracketed status line.
    pub fn status(&self, status: Status, msg: impl Display) {
        let line = if self.use_color {
            let body = if status == Status::Debug {
                format!("\x1b[90m{}\x1b[0m", msg)
            } else {
                msg.to_string()
            };
            format!("{}{}\x1b[0m{}", status.color_code(), status.label(), body)
        } else {
            format!("{}{}", status.label(), msg)
        };
        self.write_line(&line);
    }

    pub fn debug(&self, msg: impl Display) {
        self.status(Status::Debug, msg);
    }

    pub fn info(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    pub fn error(&self, msg: impl Display) {
        self.status(Status::Error, msg);
    }

    pub fn success(&self, msg: impl Display) {
        self.status(Status::Success, msg);
    }

    pub fn failure(&self, msg: impl Display) {
        self.status(Status::Failure, msg);
    }

    /// A bulleted list entry.
    pub fn item(&self, msg: impl Display) {
        self.write_line(&format!(" - {}", msg));
    }

    /// Blank line followed by a rule.
    pub fn section_start(&self) {
        self.write_line("");
        self.write_line(&"=".repeat(SECTION_RULE_WIDTH));
    }

    /// Rule followed by a blank line.
    pub fn section_end(&self) {
        self.write_line(&"=".repeat(SECTION_RULE_WIDTH));
        self.write_line("");
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}
