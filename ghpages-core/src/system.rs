//! [`Gateway`] backed by real processes and the real filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use walkdir::WalkDir;

use crate::error::{io_err, GatewayError};
use crate::gateway::{CommandLine, CommandOutput, Gateway};

/// Spawns commands with `std::process` and touches the disk with `std::fs`.
///
/// `set_current_dir` changes the working directory of the whole process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGateway;

impl SystemGateway {
    pub fn new() -> Self {
        Self
    }
}

impl Gateway for SystemGateway {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, GatewayError> {
        tracing::debug!(command = %command, "running");
        let output = Command::new(command.program())
            .args(command.arguments())
            .output()
            .map_err(|source| GatewayError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !result.stdout.trim().is_empty() {
            tracing::trace!(command = %command, stdout = %result.stdout.trim_end(), "stdout");
        }
        if !result.stderr.trim().is_empty() {
            tracing::debug!(command = %command, stderr = %result.stderr.trim_end(), "stderr");
        }
        Ok(result)
    }

    fn current_dir(&self) -> Result<PathBuf, GatewayError> {
        std::env::current_dir().map_err(|e| io_err(".", e))
    }

    fn set_current_dir(&self, dir: &Path) -> Result<(), GatewayError> {
        std::env::set_current_dir(dir).map_err(|e| io_err(dir, e))
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), GatewayError> {
        fs::create_dir_all(path).map_err(|e| io_err(path, e))
    }

    fn make_temp_dir(&self, prefix: &str) -> Result<PathBuf, GatewayError> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|e| io_err(std::env::temp_dir(), e))?;
        Ok(dir.keep())
    }

    fn copy_dir_contents(&self, src: &Path, dest: &Path) -> Result<(), GatewayError> {
        if !src.is_dir() {
            return Err(io_err(
                src,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }
        fs::create_dir_all(dest).map_err(|e| io_err(dest, e))?;

        // Symlinks are copied as what they point to; walkdir reports loops.
        for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
            let entry = entry.map_err(|source| GatewayError::Walk {
                path: src.to_path_buf(),
                source,
            })?;
            let Ok(relative) = entry.path().strip_prefix(src) else {
                continue;
            };
            let target = dest.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| io_err(&target, e))?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
                }
                fs::copy(entry.path(), &target).map_err(|e| io_err(entry.path(), e))?;
            }
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), GatewayError> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(path, e)),
        }
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<(), GatewayError> {
        fs::write(path, contents).map_err(|e| io_err(path, e))
    }
}
