//! Domain types shared by the publish pipeline.
//!
//! Names are newtypes over `String`; no validation is applied. A bad branch or
//! remote name surfaces later as a git command failure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Branch that receives the documentation snapshot.
pub const DEFAULT_BRANCH: &str = "gh-pages";
/// Remote the staging repository pushes to.
pub const DEFAULT_REMOTE: &str = "origin";
/// Documentation directory, relative to the project root.
pub const DEFAULT_DOC_DIR: &str = "doc";
/// Task grouping label; cosmetic.
pub const DEFAULT_NAMESPACE: &str = "github-pages";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Target branch on the remote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchName(pub String);

impl Default for BranchName {
    fn default() -> Self {
        Self(DEFAULT_BRANCH.to_owned())
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BranchName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BranchName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Name of the git remote inside the staging repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteName(pub String);

impl Default for RemoteName {
    fn default() -> Self {
        Self(DEFAULT_REMOTE.to_owned())
    }
}

impl fmt::Display for RemoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RemoteName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RemoteName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for RemoteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Output level of the publish task.
///
/// Quiet and verbose are two ends of one setting, so they can never both be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn is_quiet(self) -> bool {
        self == Verbosity::Quiet
    }

    pub fn is_verbose(self) -> bool {
        self == Verbosity::Verbose
    }

    /// Turning quiet on wins over verbose; turning it off only clears quiet.
    pub fn with_quiet(self, quiet: bool) -> Self {
        match (quiet, self) {
            (true, _) => Verbosity::Quiet,
            (false, Verbosity::Quiet) => Verbosity::Normal,
            (false, other) => other,
        }
    }

    /// Turning verbose on wins over quiet; turning it off only clears verbose.
    pub fn with_verbose(self, verbose: bool) -> Self {
        match (verbose, self) {
            (true, _) => Verbosity::Verbose,
            (false, Verbosity::Verbose) => Verbosity::Normal,
            (false, other) => other,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Quiet => write!(f, "quiet"),
            Verbosity::Normal => write!(f, "normal"),
            Verbosity::Verbose => write!(f, "verbose"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_defaults() {
        assert_eq!(BranchName::default().to_string(), "gh-pages");
        assert_eq!(RemoteName::default().to_string(), "origin");
    }

    #[test]
    fn newtype_equality() {
        assert_eq!(BranchName::from("x"), BranchName::from(String::from("x")));
        assert_eq!(RemoteName::from("up").as_ref(), "up");
    }

    #[test]
    fn turning_quiet_off_keeps_verbose() {
        assert_eq!(
            Verbosity::Verbose.with_quiet(false),
            Verbosity::Verbose
        );
        assert_eq!(Verbosity::Quiet.with_quiet(false), Verbosity::Normal);
    }

    #[test]
    fn turning_verbose_off_keeps_quiet() {
        assert_eq!(Verbosity::Quiet.with_verbose(false), Verbosity::Quiet);
        assert_eq!(Verbosity::Verbose.with_verbose(false), Verbosity::Normal);
    }

    #[test]
    fn verbosity_yaml_is_lowercase() {
        let yaml = serde_yaml::to_string(&Verbosity::Verbose).expect("serialize");
        assert_eq!(yaml.trim(), "verbose");
    }
}
