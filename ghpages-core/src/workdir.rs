//! Scoped working-directory changes.
//!
//! The process working directory is global state. [`WorkingDirGuard`] puts
//! the previous directory back when it goes out of scope, whether the scope
//! ends normally, through `?`, or by unwinding.

use std::path::{Path, PathBuf};

use crate::error::GatewayError;
use crate::gateway::Gateway;

/// Restores the gateway's previous working directory on drop.
pub struct WorkingDirGuard<'a> {
    gateway: &'a dyn Gateway,
    previous: PathBuf,
}

impl<'a> WorkingDirGuard<'a> {
    /// Remember the current directory, then switch to `dir`.
    pub fn enter(gateway: &'a dyn Gateway, dir: &Path) -> Result<Self, GatewayError> {
        let previous = gateway.current_dir()?;
        gateway.set_current_dir(dir)?;
        tracing::debug!(dir = %dir.display(), "entered directory");
        Ok(Self { gateway, previous })
    }

    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirGuard<'_> {
    fn drop(&mut self) {
        match self.gateway.set_current_dir(&self.previous) {
            Ok(()) => tracing::debug!(dir = %self.previous.display(), "restored directory"),
            Err(err) => tracing::warn!(error = %err, "failed to restore working directory"),
        }
    }
}

/// Run `f` with `dir` as the working directory, restoring the previous one
/// afterwards.
pub fn with_working_dir<T, E, F>(gateway: &dyn Gateway, dir: &Path, f: F) -> Result<T, E>
where
    E: From<GatewayError>,
    F: FnOnce() -> Result<T, E>,
{
    let _guard = WorkingDirGuard::enter(gateway, dir)?;
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeGateway};

    #[test]
    fn restores_previous_directory_on_success() {
        let gw = FakeGateway::with_cwd("/work");
        let seen = with_working_dir::<_, GatewayError, _>(&gw, Path::new("/stage"), || {
            gw.current_dir()
        })
        .expect("scoped call");
        assert_eq!(seen, PathBuf::from("/stage"));
        assert_eq!(gw.current_dir().unwrap(), PathBuf::from("/work"));
    }

    #[test]
    fn restores_previous_directory_on_error() {
        let gw = FakeGateway::with_cwd("/work");
        let result: Result<(), GatewayError> = with_working_dir(&gw, Path::new("/stage"), || {
            Err(GatewayError::CommandFailed {
                command: "git init".to_string(),
                code: Some(1),
                stderr: String::new(),
            })
        });
        assert!(result.is_err());
        assert_eq!(gw.current_dir().unwrap(), PathBuf::from("/work"));
        assert_eq!(
            gw.calls(),
            vec![
                Call::ChangeDir(PathBuf::from("/stage")),
                Call::ChangeDir(PathBuf::from("/work")),
            ]
        );
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        let gw = FakeGateway::with_cwd("/a");
        {
            let outer = WorkingDirGuard::enter(&gw, Path::new("/b")).unwrap();
            assert_eq!(outer.previous(), Path::new("/a"));
            {
                let inner = WorkingDirGuard::enter(&gw, Path::new("/c")).unwrap();
                assert_eq!(inner.previous(), Path::new("/b"));
            }
            assert_eq!(gw.current_dir().unwrap(), PathBuf::from("/b"));
        }
        assert_eq!(gw.current_dir().unwrap(), PathBuf::from("/a"));
    }
}
