//! Optional `github-pages.yaml` config file.
//!
//! # Example
//!
//! ```yaml
//! doc_dir: target/doc
//! repo_url: git@github.com:me/proj.git
//! branch_name: gh-pages
//! remote_name: origin
//! namespace: docs
//! verbose: true
//! ```
//!
//! Every key is optional. Values from the file override built-in defaults and
//! are themselves overridden by command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::types::{BranchName, RemoteName};

/// Looked up in the project root when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "github-pages.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<BranchName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_name: Option<RemoteName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl ConfigFile {
    /// `<project_root>/github-pages.yaml`, with no I/O.
    pub fn default_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_FILE_NAME)
    }

    /// Parse YAML text; `path` is only used for error context.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an explicitly requested file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_optional(path)?.ok_or_else(|| ConfigError::NotFound {
            path: path.to_path_buf(),
        })
    }

    /// Load `path` if it exists.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::parse(path, &contents).map(Some)
    }

    /// Copy every value present in the file onto `settings`.
    ///
    /// `quiet` is applied before `verbose`, so a file that sets both ends up
    /// verbose.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(doc_dir) = &self.doc_dir {
            settings.set_doc_dir(doc_dir.clone());
        }
        if let Some(repo_url) = &self.repo_url {
            settings.set_repo_url(repo_url.clone());
        }
        if let Some(branch_name) = &self.branch_name {
            settings.set_branch_name(branch_name.clone());
        }
        if let Some(remote_name) = &self.remote_name {
            settings.set_remote_name(remote_name.clone());
        }
        if let Some(staging_dir) = &self.staging_dir {
            settings.set_staging_dir(staging_dir.clone());
        }
        if let Some(namespace) = &self.namespace {
            settings.set_namespace(namespace.clone());
        }
        if let Some(quiet) = self.quiet {
            settings.set_quiet(quiet);
        }
        if let Some(verbose) = self.verbose {
            settings.set_verbose(verbose);
        }
    }
}
