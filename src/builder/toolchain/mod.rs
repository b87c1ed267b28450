//! Command-line synthesis for the MSVC and Clang dialects.
//!
//! Every compiler invocation is assembled by [`synthesize`] in one fixed
//! order; the dialects only decide how each piece is spelled and which
//! executable runs it:
//!
//! 1. executable
//! 2. baseline flags (warnings are always errors)
//! 3. debug/release flags
//! 4. compile-only flag
//! 5. platform-identity and build-mode defines
//! 6. language standard
//! 7. cross-target flags (sysroot, triple)
//! 8. include directories
//! 9. inputs
//! 10. output and dialect-specific trailing flags
//!
//! Synthesis has no side effects; it only reads the resolved toolchain
//! paths held by the platform.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::language::Language;
use crate::core::platform::{Platform, TargetOs};

mod clang;
mod detect;
mod msvc;

pub use clang::{ClangDialect, ClangTarget};
pub use detect::{discover, EnvSource, ProcessEnv};
pub use msvc::MsvcDialect;

/// Spelling family of command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagStyle {
    /// `cl.exe` style: `/c`, `/D`, `/I`, `/std:`
    Msvc,
    /// Clang/GCC style: `-c`, `-D`, `-I`, `-std=`
    Clang,
}

impl FlagStyle {
    pub fn define(&self, name: &str, value: Option<&str>) -> String {
        let spec = match self {
            FlagStyle::Msvc => "/D",
            FlagStyle::Clang => "-D",
        };
        match value {
            Some(v) => format!("{}{}={}", spec, name, v),
            None => format!("{}{}", spec, name),
        }
    }

    pub fn include(&self, dir: &Path) -> String {
        match self {
            FlagStyle::Msvc => format!("/I{}", dir.display()),
            FlagStyle::Clang => format!("-I{}", dir.display()),
        }
    }

    pub fn standard(&self, lang: Language) -> String {
        match self {
            FlagStyle::Msvc => format!("/std:{}", lang.standard()),
            FlagStyle::Clang => format!("-std={}", lang.standard()),
        }
    }

    pub fn compile_only(&self) -> &'static str {
        match self {
            FlagStyle::Msvc => "/c",
            FlagStyle::Clang => "-c",
        }
    }
}

/// A synthesized command: program plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to run (e.g., "clang", "cl.exe")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
    style: FlagStyle,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>, style: FlagStyle) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            style,
        }
    }

    pub fn style(&self) -> FlagStyle {
        self.style
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    pub fn with_compile_only(self) -> Self {
        let flag = self.style.compile_only();
        self.arg(flag)
    }

    pub fn with_define(self, name: &str, value: Option<&str>) -> Self {
        let flag = self.style.define(name, value);
        self.arg(flag)
    }

    pub fn with_standard(self, lang: Language) -> Self {
        let flag = self.style.standard(lang);
        self.arg(flag)
    }

    pub fn with_include_dirs(mut self, dirs: &[PathBuf]) -> Self {
        for dir in dirs {
            let flag = self.style.include(dir);
            self = self.arg(flag);
        }
        self
    }

    pub fn with_paths(self, paths: &[PathBuf]) -> Self {
        self.args(paths.iter().map(|p| p.display().to_string()))
    }

    /// The argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.display().to_string());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Whether any argument equals `flag`.
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

/// What a [`BuildOperation`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Source to object file.
    CompileOnly,
    /// Objects to static library.
    StaticLink,
    /// Sources and libraries to executable.
    ExecBuild,
}

/// One compiler/linker invocation to synthesize.
#[derive(Debug, Clone)]
pub struct BuildOperation<'a> {
    pub kind: OperationKind,
    pub platform: &'a Platform,
    pub debug: bool,
    /// Sources or objects, in order; never empty.
    pub inputs: Vec<PathBuf>,
    /// Output file; its parent directory must already exist.
    pub output: PathBuf,
    pub include_dirs: Vec<PathBuf>,
    /// System libraries, without prefix or extension. ExecBuild only.
    pub extra_libs: Vec<String>,
    pub language: Language,
    /// Prefix for the platform-identity defines, when requested.
    pub define_prefix: Option<String>,
}

impl<'a> BuildOperation<'a> {
    fn new(
        kind: OperationKind,
        platform: &'a Platform,
        inputs: Vec<PathBuf>,
        output: PathBuf,
    ) -> Self {
        debug_assert!(!inputs.is_empty(), "build operation without inputs");
        BuildOperation {
            kind,
            platform,
            debug: false,
            inputs,
            output,
            include_dirs: Vec::new(),
            extra_libs: Vec::new(),
            language: Language::C,
            define_prefix: None,
        }
    }

    pub fn compile(platform: &'a Platform, source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::new(
            OperationKind::CompileOnly,
            platform,
            vec![source.into()],
            output.into(),
        )
    }

    pub fn static_link(platform: &'a Platform, objects: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::new(OperationKind::StaticLink, platform, objects, output.into())
    }

    pub fn executable(platform: &'a Platform, inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::new(OperationKind::ExecBuild, platform, inputs, output.into())
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn env_defines(mut self, prefix: impl Into<String>) -> Self {
        self.define_prefix = Some(prefix.into());
        self
    }

    pub fn include_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.include_dirs = dirs;
        self
    }

    pub fn libs(mut self, libs: Vec<String>) -> Self {
        self.extra_libs = libs;
        self
    }
}

/// Per-dialect spelling and executable layout.
pub trait Dialect {
    fn style(&self) -> FlagStyle;

    /// C or C++ compiler driver.
    fn compiler_path(&self, lang: Language) -> PathBuf;

    /// Archiver / librarian.
    fn static_linker_path(&self) -> PathBuf;

    /// Flags every compiler invocation starts with.
    fn baseline_flags(&self) -> Vec<String>;

    /// Optimisation, debug-info and `DEBUG`/`NDEBUG` flags.
    fn mode_flags(&self, debug: bool) -> Vec<String>;

    /// Defines added after the platform-identity defines.
    fn extra_env_defines(&self) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    /// Sysroot and target-triple flags.
    fn cross_target_flags(&self) -> Vec<String>;

    /// Output naming for a compile-only step.
    fn object_output(&self, cmd: CommandSpec, op: &BuildOperation<'_>) -> CommandSpec;

    /// Output naming, system libraries and debug info for an executable.
    fn exe_output(&self, cmd: CommandSpec, op: &BuildOperation<'_>) -> CommandSpec;

    fn archive_command(&self, op: &BuildOperation<'_>) -> CommandSpec;
}

/// Pick the dialect for a platform: MSVC for Windows, Clang elsewhere.
pub fn dialect_for(platform: &Platform) -> Box<dyn Dialect + '_> {
    match platform.os() {
        TargetOs::Windows => Box::new(MsvcDialect::new(platform)),
        TargetOs::Linux => Box::new(ClangDialect::new(platform, ClangTarget::Linux)),
        TargetOs::Android => Box::new(ClangDialect::new(platform, ClangTarget::Android)),
        TargetOs::Osx => Box::new(ClangDialect::new(platform, ClangTarget::Osx)),
        TargetOs::Ios => Box::new(ClangDialect::new(platform, ClangTarget::Ios)),
        TargetOs::IosSimulator => Box::new(ClangDialect::new(platform, ClangTarget::IosSimulator)),
    }
}

/// Knobs for the shared prefix of every compiler invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonFlags<'p> {
    pub debug: bool,
    pub compile_only: bool,
    pub define_prefix: Option<&'p str>,
    pub standard: Option<Language>,
}

/// Steps 2 to 7 of the fixed order.
pub fn push_common_flags(dialect: &dyn Dialect, mut cmd: CommandSpec, flags: CommonFlags<'_>, platform: &Platform) -> CommandSpec {
    cmd = cmd.args(dialect.baseline_flags());
    cmd = cmd.args(dialect.mode_flags(flags.debug));

    if flags.compile_only {
        cmd = cmd.with_compile_only();
    }

    if let Some(prefix) = flags.define_prefix {
        cmd = cmd
            .with_define(&format!("{}_{}", prefix, platform.os().define_suffix()), Some("1"))
            .with_define(&format!("{}_{}", prefix, platform.arch().define_suffix()), Some("1"));
        let mode = if flags.debug { "DBG" } else { "REL" };
        cmd = cmd.with_define(&format!("{}_{}", prefix, mode), Some("1"));
        for (name, value) in dialect.extra_env_defines() {
            cmd = cmd.with_define(name, Some(value));
        }
    }

    if let Some(lang) = flags.standard {
        cmd = cmd.with_standard(lang);
    }

    cmd.args(dialect.cross_target_flags())
}

/// The common compiler arguments for a platform without defines or
/// standard, as shown to editors.
pub fn editor_compiler_args(platform: &Platform) -> Vec<String> {
    let dialect = dialect_for(platform);
    let cmd = CommandSpec::new(dialect.compiler_path(Language::C), dialect.style());
    push_common_flags(dialect.as_ref(), cmd, CommonFlags::default(), platform).args
}

/// Turn a build operation into the exact command to run.
pub fn synthesize(op: &BuildOperation<'_>) -> CommandSpec {
    let dialect = dialect_for(op.platform);

    if op.kind == OperationKind::StaticLink {
        return dialect.archive_command(op);
    }

    let cmd = CommandSpec::new(dialect.compiler_path(op.language), dialect.style());
    let flags = CommonFlags {
        debug: op.debug,
        compile_only: op.kind == OperationKind::CompileOnly,
        define_prefix: op.define_prefix.as_deref(),
        standard: Some(op.language),
    };

    let cmd = push_common_flags(dialect.as_ref(), cmd, flags, op.platform)
        .with_include_dirs(&op.include_dirs)
        .with_paths(&op.inputs);

    match op.kind {
        OperationKind::CompileOnly => dialect.object_output(cmd, op),
        OperationKind::ExecBuild => dialect.exe_output(cmd, op),
        OperationKind::StaticLink => unreachable!("handled above"),
    }
}
