//! The publish sequence.
//!
//! ## Steps
//!
//! 1. Create the staging directory if it is missing.
//! 2. Enter it (the previous working directory comes back on every exit path).
//! 3. `git init`, then add the remote.
//! 4. Probe the remote for the target branch.
//! 5. Existing branch: fetch just that branch and check it out.
//!    New branch: orphan branch with a placeholder `index.html`, committed and
//!    pushed so the remote branch exists before anything else happens.
//! 6. `git rm -r .` so the branch ends up holding only the new snapshot.
//!    Failure is ignored (an empty branch has nothing to remove).
//! 7. Copy the contents of the doc directory in.
//! 8. Add, then ask `git diff --cached --quiet` whether anything is staged.
//!    If so, commit and push upstream; otherwise stop without a commit.
//! 9. Leave the staging directory.
//! 10. Delete the staging directory, whether or not the steps above succeeded.

use std::path::{Path, PathBuf};

use ghpages_core::{
    with_working_dir, CommandLine, CommandOutput, Gateway, GatewayError, Settings,
};

use crate::error::PublishError;

/// File written to a freshly created branch.
pub const PLACEHOLDER_FILE: &str = "index.html";
pub const PLACEHOLDER_CONTENTS: &str = "Future home of documentation";
/// Commit message for the placeholder commit on a new branch.
pub const CREATE_BRANCH_MESSAGE: &str = "Create the documentation branch";
/// Commit message for each documentation snapshot.
pub const COMMIT_MESSAGE: &str = "Updating documentation";


// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// How the target branch was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchSource {
    /// The branch already existed on the remote and was fetched.
    Fetched,
    /// The branch was created as an orphan and pushed with a placeholder.
    Created,
}

/// Whether the snapshot produced a new commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A commit was made and pushed.
    Published,
    /// The snapshot matched the branch; nothing was pushed.
    Unchanged,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub branch: BranchSource,
    pub outcome: PublishOutcome,
    /// Already deleted by the time the report is returned.
    pub staging_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

/// Every value the sequence needs, resolved up front.
#[derive(Debug)]
struct Plan<'s> {
    repo_url: &'s str,
    doc_source: PathBuf,
    staging_dir: &'s Path,
    remote: &'s str,
    branch: &'s str,
}

/// Runs the publish sequence for one [`Settings`] through one [`Gateway`].
///
/// Holds no state of its own; `run` may be called again with the same
/// settings, though the staging directory is deleted after each run.
pub struct Publisher<'a> {
    settings: &'a Settings,
    gateway: &'a dyn Gateway,
}

impl<'a> Publisher<'a> {
    pub fn new(settings: &'a Settings, gateway: &'a dyn Gateway) -> Self {
        Self { settings, gateway }
    }

    /// Publish the doc directory to the target branch.
    ///
    /// Settings are resolved before anything is created, so a resolution
    /// failure leaves nothing behind. Once the staging directory exists it is
    /// removed exactly once, on success and on failure. If both the sequence
    /// and the cleanup fail, the sequence error is returned.
    pub fn run(&self) -> Result<PublishReport, PublishError> {
        let plan = self.plan()?;
        tracing::info!(
            doc_dir = %plan.doc_source.display(),
            repo = plan.repo_url,
            branch = plan.branch,
            "publishing documentation"
        );

        let result = self.publish(&plan);
        let cleanup = self.gateway.remove_dir_all(plan.staging_dir);

        match (result, cleanup) {
            (Ok(report), Ok(())) => {
                tracing::info!(outcome = ?report.outcome, "publish finished");
                Ok(report)
            }
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(cleanup_err)) => {
                tracing::warn!(
                    dir = %plan.staging_dir.display(),
                    error = %cleanup_err,
                    "failed to remove staging directory"
                );
                Err(err)
            }
        }
    }

    fn plan(&self) -> Result<Plan<'a>, PublishError> {
        let settings = self.settings;
        let project_root = settings.project_root(self.gateway)?;
        let repo_url = settings.repo_url(self.gateway)?;
        let doc_source = self.gateway.expand_path(settings.doc_dir(), project_root);
        let staging_dir = settings.staging_dir(self.gateway)?;
        Ok(Plan {
            repo_url,
            doc_source,
            staging_dir,
            remote: settings.remote_name().as_ref(),
            branch: settings.branch_name().as_ref(),
        })
    }

    fn publish(&self, plan: &Plan<'_>) -> Result<PublishReport, PublishError> {
        if !self.gateway.dir_exists(plan.staging_dir) {
            self.gateway.create_dir_all(plan.staging_dir)?;
        }

        with_working_dir(self.gateway, plan.staging_dir, || {
            self.init_staging_repo(plan)?;
            let branch = if self.remote_branch_exists(plan)? {
                self.checkout_existing_branch(plan)?;
                BranchSource::Fetched
            } else {
                self.create_new_branch(plan)?;
                BranchSource::Created
            };
            self.remove_staging_files()?;
            self.copy_docs(plan)?;
            let outcome = self.commit_and_push(plan)?;
            Ok(PublishReport {
                branch,
                outcome,
                staging_dir: plan.staging_dir.to_path_buf(),
            })
        })
    }

    fn init_staging_repo(&self, plan: &Plan<'_>) -> Result<(), PublishError> {
        self.sh(CommandLine::git(["init"]))?;
        self.sh(CommandLine::git(["remote", "add", plan.remote, plan.repo_url]))?;
        Ok(())
    }

    /// True only when `ls-remote` succeeds and lists exactly
    /// `refs/heads/<branch>`. Git matches patterns against the tail of a ref,
    /// so `old/<branch>` must not count.
    fn remote_branch_exists(&self, plan: &Plan<'_>) -> Result<bool, PublishError> {
        let head = format!("refs/heads/{}", plan.branch);
        let probe = CommandLine::git(["ls-remote", "--exit-code", "--heads", plan.repo_url])
            .arg(head.as_str());
        let output = self.gateway.run(&probe)?;
        let exists = output.success() && lists_ref(&output.stdout, &head);
        tracing::debug!(branch = plan.branch, exists, code = ?output.code, "probed remote branch");
        Ok(exists)
    }

    fn checkout_existing_branch(&self, plan: &Plan<'_>) -> Result<(), PublishError> {
        tracing::info!(branch = plan.branch, "fetching existing branch");
        self.sh(CommandLine::git(["fetch", plan.remote, plan.branch]))?;
        self.sh(CommandLine::git(["checkout", plan.branch]))?;
        Ok(())
    }

    fn create_new_branch(&self, plan: &Plan<'_>) -> Result<(), PublishError> {
        tracing::info!(branch = plan.branch, "creating documentation branch");
        self.sh(CommandLine::git(["checkout", "--orphan", plan.branch]))?;
        self.gateway
            .write_file(Path::new(PLACEHOLDER_FILE), PLACEHOLDER_CONTENTS)?;
        self.sh(CommandLine::git(["add", "."]))?;
        self.sh(CommandLine::git(["commit", "-m", CREATE_BRANCH_MESSAGE]))?;
        self.sh(CommandLine::git(["push", plan.remote, plan.branch]))?;
        Ok(())
    }

    fn remove_staging_files(&self) -> Result<(), PublishError> {
        let output = self.gateway.run(&CommandLine::git(["rm", "-r", "."]))?;
        if !output.success() {
            tracing::warn!(
                stderr = %output.stderr.trim(),
                "could not clear staging files; continuing"
            );
        }
        Ok(())
    }

    fn copy_docs(&self, plan: &Plan<'_>) -> Result<(), PublishError> {
        tracing::debug!(from = %plan.doc_source.display(), "copying documentation");
        self.gateway
            .copy_dir_contents(&plan.doc_source, plan.staging_dir)?;
        Ok(())
    }

    fn commit_and_push(&self, plan: &Plan<'_>) -> Result<PublishOutcome, PublishError> {
        self.sh(CommandLine::git(["add", "."]))?;

        if !self.has_staged_changes()? {
            tracing::info!("documentation unchanged; skipping commit and push");
            return Ok(PublishOutcome::Unchanged);
        }

        self.sh(CommandLine::git(["commit", "-m", COMMIT_MESSAGE]))?;

        self.sh(CommandLine::git([
            "push",
            "--set-upstream",
            plan.remote,
            plan.branch,
        ]))?;
        Ok(PublishOutcome::Published)
    }

    /// `git diff --cached --quiet` exits 1 when the index differs from
    /// `HEAD` and 0 when it does not; anything else is a failure.
    fn has_staged_changes(&self) -> Result<bool, PublishError> {
        let diff = CommandLine::git(["diff", "--cached", "--quiet"]);
        let output = self.gateway.run(&diff)?;
        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(command_failed(&diff, &output)),
        }
    }

    fn sh(&self, command: CommandLine) -> Result<CommandOutput, PublishError> {
        Ok(self.gateway.sh(&command)?)
    }
}

/// Whether `ls-remote` output has a line naming exactly `reference`.
fn lists_ref(stdout: &str, reference: &str) -> bool {
    stdout
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .any(|(_, name)| name.trim_end() == reference)
}

fn command_failed(command: &CommandLine, output: &CommandOutput) -> PublishError {
    PublishError::Gateway(GatewayError::CommandFailed {
        command: command.to_string(),
        code: output.code,
        stderr: output.stderr.trim().to_string(),
    })
}
