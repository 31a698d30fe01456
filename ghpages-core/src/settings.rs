//! Configuration of one publish run.
//!
//! Plain fields start at their defaults. The three derived fields
//! (`project_root`, `repo_url`, `staging_dir`) are resolved through a
//! [`Gateway`] on first read and cached for the life of the value: later reads
//! return the cached value even if the repository or working directory has
//! changed since. Setting a derived field replaces whatever was cached.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::gateway::{CommandLine, Gateway};
use crate::types::{
    BranchName, RemoteName, Verbosity, DEFAULT_DOC_DIR, DEFAULT_NAMESPACE,
};
use crate::workdir::with_working_dir;

/// Prefix of the staging directory created when none is configured.
pub const STAGING_DIR_PREFIX: &str = "github-pages-publish-";

#[derive(Debug, Clone)]
pub struct Settings {
    doc_dir: PathBuf,
    branch_name: BranchName,
    remote_name: RemoteName,
    namespace: String,
    verbosity: Verbosity,
    project_root: OnceCell<PathBuf>,
    repo_url: OnceCell<String>,
    staging_dir: OnceCell<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            doc_dir: PathBuf::from(DEFAULT_DOC_DIR),
            branch_name: BranchName::default(),
            remote_name: RemoteName::default(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            verbosity: Verbosity::default(),
            project_root: OnceCell::new(),
            repo_url: OnceCell::new(),
            staging_dir: OnceCell::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Plain fields
    // -----------------------------------------------------------------------

    /// Documentation directory, relative to [`project_root`](Self::project_root).
    pub fn doc_dir(&self) -> &Path {
        &self.doc_dir
    }

    pub fn set_doc_dir(&mut self, doc_dir: impl Into<PathBuf>) {
        self.doc_dir = doc_dir.into();
    }

    pub fn branch_name(&self) -> &BranchName {
        &self.branch_name
    }

    pub fn set_branch_name(&mut self, branch_name: impl Into<BranchName>) {
        self.branch_name = branch_name.into();
    }

    pub fn remote_name(&self) -> &RemoteName {
        &self.remote_name
    }

    /// Note: a cached `repo_url` derived from the old remote is kept.
    pub fn set_remote_name(&mut self, remote_name: impl Into<RemoteName>) {
        self.remote_name = remote_name.into();
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    pub fn quiet(&self) -> bool {
        self.verbosity.is_quiet()
    }

    /// `true` also turns verbose off.
    pub fn set_quiet(&mut self, quiet: bool) {
        self.verbosity = self.verbosity.with_quiet(quiet);
    }

    pub fn verbose(&self) -> bool {
        self.verbosity.is_verbose()
    }

    /// `true` also turns quiet off.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbosity = self.verbosity.with_verbose(verbose);
    }

    // -----------------------------------------------------------------------
    // Derived fields
    // -----------------------------------------------------------------------

    /// Absolute path of the repository the docs belong to.
    ///
    /// Default: `git rev-parse --show-toplevel` in the current directory.
    pub fn project_root(&self, gateway: &dyn Gateway) -> Result<&Path, SettingsError> {
        cached(&self.project_root, || {
            let command = CommandLine::git(["rev-parse", "--show-toplevel"]);
            derive(gateway, "project_root", &command).map(PathBuf::from)
        })
        .map(PathBuf::as_path)
    }

    pub fn set_project_root(&mut self, project_root: impl Into<PathBuf>) {
        self.project_root = OnceCell::from(project_root.into());
    }

    /// URL of the repository that receives the docs.
    ///
    /// Default: `git config --get remote.<remote_name>.url`, run inside
    /// [`project_root`](Self::project_root).
    pub fn repo_url(&self, gateway: &dyn Gateway) -> Result<&str, SettingsError> {
        cached(&self.repo_url, || {
            let root = self.project_root(gateway)?;
            let key = format!("remote.{}.url", self.remote_name);
            let command = CommandLine::git(["config", "--get"]).arg(key);
            with_working_dir(gateway, root, || derive(gateway, "repo_url", &command))
        })
        .map(String::as_str)
    }

    pub fn set_repo_url(&mut self, repo_url: impl Into<String>) {
        self.repo_url = OnceCell::from(repo_url.into());
    }

    /// Scratch working copy for the target branch. Deleted after each run.
    ///
    /// Default: a fresh temporary directory prefixed with
    /// [`STAGING_DIR_PREFIX`].
    pub fn staging_dir(&self, gateway: &dyn Gateway) -> Result<&Path, SettingsError> {
        cached(&self.staging_dir, || {
            let dir = gateway.make_temp_dir(STAGING_DIR_PREFIX)?;
            tracing::debug!(dir = %dir.display(), "created staging directory");
            Ok(dir)
        })
        .map(PathBuf::as_path)
    }

    pub fn set_staging_dir(&mut self, staging_dir: impl Into<PathBuf>) {
        self.staging_dir = OnceCell::from(staging_dir.into());
    }

    // -----------------------------------------------------------------------
    // Task surface
    // -----------------------------------------------------------------------

    /// `<namespace>:publish`
    pub fn task_name(&self) -> String {
        format!("{}:publish", self.namespace)
    }

    /// `Publish <doc_dir> to <repo_url>#<branch_name>`
    pub fn description(&self, gateway: &dyn Gateway) -> Result<String, SettingsError> {
        Ok(format!(
            "Publish {} to {}#{}",
            self.doc_dir.display(),
            self.repo_url(gateway)?,
            self.branch_name
        ))
    }
}

fn cached<T>(
    cell: &OnceCell<T>,
    init: impl FnOnce() -> Result<T, SettingsError>,
) -> Result<&T, SettingsError> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}

/// Run `command` and take its output, minus the trailing newline, as the value.
fn derive(
    gateway: &dyn Gateway,
    field: &'static str,
    command: &CommandLine,
) -> Result<String, SettingsError> {
    let output = gateway.run(command)?;
    let value = output.stdout.trim_end_matches(['\r', '\n']);
    if !output.success() || value.is_empty() {
        return Err(SettingsError::Unresolved {
            field,
            command: command.to_string(),
            stderr: output.stderr.trim().to_string(),
        });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeGateway};
    use crate::gateway::CommandOutput;

    fn toplevel() -> CommandLine {
        CommandLine::git(["rev-parse", "--show-toplevel"])
    }

    #[test]
    fn plain_defaults() {
        let s = Settings::new();
        assert_eq!(s.doc_dir(), Path::new("doc"));
        assert_eq!(s.branch_name().as_ref(), "gh-pages");
        assert_eq!(s.remote_name().as_ref(), "origin");
        assert_eq!(s.namespace(), "github-pages");
        assert!(!s.quiet());
        assert!(!s.verbose());
    }

    #[test]
    fn project_root_strips_trailing_newline() {
        let gw = FakeGateway::new();
        gw.stub(&toplevel(), CommandOutput::ok("/home/me/proj\n"));
        let s = Settings::new();
        assert_eq!(s.project_root(&gw).unwrap(), Path::new("/home/me/proj"));
    }

    #[test]
    fn repo_url_runs_inside_project_root() {
        let gw = FakeGateway::with_cwd("/elsewhere");
        gw.stub(
            &CommandLine::git(["config", "--get", "remote.upstream.url"]),
            CommandOutput::ok("git@github.com:me/proj.git\n"),
        );
        let mut s = Settings::new();
        s.set_project_root("/home/me/proj");
        s.set_remote_name("upstream");

        assert_eq!(s.repo_url(&gw).unwrap(), "git@github.com:me/proj.git");
        assert_eq!(
            gw.calls(),
            vec![
                Call::ChangeDir(PathBuf::from("/home/me/proj")),
                Call::Run("git config --get remote.upstream.url".to_string()),
                Call::ChangeDir(PathBuf::from("/elsewhere")),
            ]
        );
    }

    #[test]
    fn failed_derivation_is_not_cached() {
        let gw = FakeGateway::new();
        gw.stub(
            &toplevel(),
            CommandOutput::failed(128, "fatal: not a git repository\n"),
        );
        let s = Settings::new();
        let err = s.project_root(&gw).unwrap_err();
        assert!(err.to_string().contains("not a git repository"), "got: {err}");

        gw.stub(&toplevel(), CommandOutput::ok("/recovered\n"));
        assert_eq!(s.project_root(&gw).unwrap(), Path::new("/recovered"));
    }

    #[test]
    fn empty_output_is_unresolved() {
        let gw = FakeGateway::new();
        let mut s = Settings::new();
        s.set_project_root("/p");
        let err = s.repo_url(&gw).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Unresolved { field: "repo_url", .. }
        ));
    }

    #[test]
    fn setter_replaces_cached_value() {
        let gw = FakeGateway::new();
        let mut s = Settings::new();
        let first = s.staging_dir(&gw).unwrap().to_path_buf();
        s.set_staging_dir("/custom/stage");
        assert_ne!(first, PathBuf::from("/custom/stage"));
        assert_eq!(s.staging_dir(&gw).unwrap(), Path::new("/custom/stage"));
    }

    #[test]
    fn description_interpolates_settings() {
        let gw = FakeGateway::new();
        let mut s = Settings::new();
        s.set_repo_url("https://github.com/me/proj.git");
        s.set_doc_dir("site");
        s.set_branch_name("pages");
        assert_eq!(
            s.description(&gw).unwrap(),
            "Publish site to https://github.com/me/proj.git#pages"
        );
        assert_eq!(s.task_name(), "github-pages:publish");
        assert!(gw.calls().is_empty(), "explicit repo_url needs no lookup");
    }
}
