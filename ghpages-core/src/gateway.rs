//! The boundary between the publish pipeline and the outside world.
//!
//! Every process spawn and filesystem touch goes through [`Gateway`], so the
//! pipeline can run against [`SystemGateway`](crate::system::SystemGateway)
//! for real or against [`FakeGateway`](crate::fake::FakeGateway) in tests.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::GatewayError;

// ---------------------------------------------------------------------------
// Command lines
// ---------------------------------------------------------------------------

/// A program plus its arguments. Arguments are passed verbatim, never through
/// a shell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// `git <args…>`
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git").args(args)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

/// Renders a shell-like line, single-quoting arguments that need it.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            f.write_str(" ")?;
            if needs_quoting(arg) {
                write!(f, "'{}'", arg.replace('\'', r"'\''"))?;
            } else {
                f.write_str(arg)?;
            }
        }
        Ok(())
    }
}

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '$' | '`' | '\\' | ';' | '&' | '|'))
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Exit 0 with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Non-zero exit with the given stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Process and filesystem operations used by the publish pipeline.
///
/// Relative paths and spawned commands resolve against the gateway's current
/// working directory.
pub trait Gateway {
    /// Run a command to completion. A non-zero exit is reported in the
    /// returned [`CommandOutput`], not as an error; only a failure to start
    /// the program is an error.
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, GatewayError>;

    /// Like [`run`](Gateway::run), but a non-zero exit becomes
    /// [`GatewayError::CommandFailed`].
    fn sh(&self, command: &CommandLine) -> Result<CommandOutput, GatewayError> {
        let output = self.run(command)?;
        if output.success() {
            Ok(output)
        } else {
            Err(GatewayError::CommandFailed {
                command: command.to_string(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    fn current_dir(&self) -> Result<PathBuf, GatewayError>;

    fn set_current_dir(&self, dir: &Path) -> Result<(), GatewayError>;

    fn dir_exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<(), GatewayError>;

    /// Create a fresh, uniquely named directory whose name starts with
    /// `prefix`. The directory is left on disk; removing it is the caller's job.
    fn make_temp_dir(&self, prefix: &str) -> Result<PathBuf, GatewayError>;

    /// Copy everything inside `src` into `dest`, merging with and overwriting
    /// what is already there (`cp -r src/. dest`).
    fn copy_dir_contents(&self, src: &Path, dest: &Path) -> Result<(), GatewayError>;

    /// Recursively delete `path`. A missing path is not an error.
    fn remove_dir_all(&self, path: &Path) -> Result<(), GatewayError>;

    fn write_file(&self, path: &Path, contents: &str) -> Result<(), GatewayError>;

    /// Absolute form of `path` relative to `base`.
    fn expand_path(&self, path: &Path, base: &Path) -> PathBuf {
        expand_path(path, base)
    }
}

/// Join `path` onto `base` and fold `.` and `..` components lexically.
///
/// An absolute `path` ignores `base`. No symlinks are resolved.
pub fn expand_path(path: &Path, base: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in base.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
