//! Error types for ghpages-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a [`Gateway`](crate::gateway::Gateway) while touching the
/// outside world (processes and the filesystem).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Filesystem failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The program could not be started at all (not on PATH, permission denied).
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited non-zero.
    #[error("`{command}` failed ({}): {stderr}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Directory walk failure during a recursive copy.
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Errors from resolving a derived [`Settings`](crate::settings::Settings) field.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The command that derives a default produced no usable value.
    #[error("cannot determine {field} from `{command}`{}", stderr_suffix(.stderr))]
    Unresolved {
        field: &'static str,
        command: String,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Errors from loading a `github-pages.yaml` config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with the offending file.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },
}

/// Convenience constructor for [`GatewayError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> GatewayError {
    GatewayError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_message_includes_status_and_stderr() {
        let err = GatewayError::CommandFailed {
            command: "git push origin gh-pages".to_string(),
            code: Some(128),
            stderr: "fatal: repository not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("`git push origin gh-pages`"));
        assert!(msg.contains("exit status 128"));
        assert!(msg.contains("repository not found"));
    }

    #[test]
    fn command_failed_without_code_reports_signal() {
        let err = GatewayError::CommandFailed {
            command: "git fetch".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn unresolved_omits_empty_stderr() {
        let err = SettingsError::Unresolved {
            field: "repo_url",
            command: "git config --get remote.origin.url".to_string(),
            stderr: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "cannot determine repo_url from `git config --get remote.origin.url`"
        );
    }
}
