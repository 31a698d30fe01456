//! In-memory [`Gateway`] that records calls and returns scripted results.
//!
//! Nothing touches the real process or filesystem. Commands that were not
//! stubbed succeed with empty output; directories exist once created through
//! the gateway or registered with [`FakeGateway::add_dir`].

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{io_err, GatewayError};
use crate::gateway::{CommandLine, CommandOutput, Gateway};

/// One observable gateway call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Rendered command line (see [`CommandLine`]'s `Display`).
    Run(String),
    DirExists(PathBuf),
    CreateDir(PathBuf),
    ChangeDir(PathBuf),
    MakeTempDir(String),
    CopyDirContents { src: PathBuf, dest: PathBuf },
    RemoveDir(PathBuf),
    WriteFile { path: PathBuf, contents: String },
}

/// Filesystem operations that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsOp {
    CreateDir,
    MakeTempDir,
    CopyDirContents,
    RemoveDir,
    WriteFile,
}

/// Recording test double for [`Gateway`].
#[derive(Debug)]
pub struct FakeGateway {
    calls: RefCell<Vec<Call>>,
    stubs: RefCell<HashMap<String, CommandOutput>>,
    cwd: RefCell<PathBuf>,
    dirs: RefCell<HashSet<PathBuf>>,
    failures: RefCell<HashSet<FsOp>>,
    temp_counter: Cell<usize>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::with_cwd("/work")
    }
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            stubs: RefCell::new(HashMap::new()),
            cwd: RefCell::new(cwd.into()),
            dirs: RefCell::new(HashSet::new()),
            failures: RefCell::new(HashSet::new()),
            temp_counter: Cell::new(0),
        }
    }

    /// From now on, `command` (matched by its rendered line) returns `output`.
    pub fn stub(&self, command: &CommandLine, output: CommandOutput) -> &Self {
        self.stubs.borrow_mut().insert(command.to_string(), output);
        self
    }

    /// Make every later `op` call fail with a permission error.
    pub fn fail(&self, op: FsOp) -> &Self {
        self.failures.borrow_mut().insert(op);
        self
    }

    /// Pretend `dir` already exists.
    pub fn add_dir(&self, dir: impl Into<PathBuf>) -> &Self {
        self.dirs.borrow_mut().insert(dir.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Only the rendered command lines, in order.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Run(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many times `command` ran.
    pub fn run_count(&self, command: &CommandLine) -> usize {
        let line = command.to_string();
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Run(l) if *l == line))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, op: FsOp, path: &Path) -> Result<(), GatewayError> {
        if self.failures.borrow().contains(&op) {
            return Err(io_err(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "scripted failure"),
            ));
        }
        Ok(())
    }
}

impl Gateway for FakeGateway {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, GatewayError> {
        let line = command.to_string();
        self.record(Call::Run(line.clone()));
        Ok(self
            .stubs
            .borrow()
            .get(&line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }

    fn current_dir(&self) -> Result<PathBuf, GatewayError> {
        Ok(self.cwd.borrow().clone())
    }

    fn set_current_dir(&self, dir: &Path) -> Result<(), GatewayError> {
        self.record(Call::ChangeDir(dir.to_path_buf()));
        *self.cwd.borrow_mut() = dir.to_path_buf();
        Ok(())
    }

    fn dir_exists(&self, path: &Path) -> bool {
        self.record(Call::DirExists(path.to_path_buf()));
        self.dirs.borrow().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), GatewayError> {
        self.record(Call::CreateDir(path.to_path_buf()));
        self.check(FsOp::CreateDir, path)?;
        self.dirs.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }

    fn make_temp_dir(&self, prefix: &str) -> Result<PathBuf, GatewayError> {
        self.record(Call::MakeTempDir(prefix.to_string()));
        let n = self.temp_counter.get() + 1;
        self.temp_counter.set(n);
        let dir = PathBuf::from(format!("/tmp/{prefix}{n}"));
        self.check(FsOp::MakeTempDir, &dir)?;
        self.dirs.borrow_mut().insert(dir.clone());
        Ok(dir)
    }

    fn copy_dir_contents(&self, src: &Path, dest: &Path) -> Result<(), GatewayError> {
        self.record(Call::CopyDirContents {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
        });
        self.check(FsOp::CopyDirContents, src)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), GatewayError> {
        self.record(Call::RemoveDir(path.to_path_buf()));
        self.check(FsOp::RemoveDir, path)?;
        self.dirs.borrow_mut().remove(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<(), GatewayError> {
        self.record(Call::WriteFile {
            path: path.to_path_buf(),
            contents: contents.to_string(),
        });
        self.check(FsOp::WriteFile, path)
    }
}
