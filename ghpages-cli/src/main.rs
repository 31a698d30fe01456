//! ghpages: publish a documentation directory to a git branch.
//!
//! # Usage
//!
//! ```text
//! ghpages publish [--doc-dir DIR] [--repo-url URL] [--branch BRANCH] [-q|-v] ...
//! ghpages describe [--json] ...
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{describe::DescribeArgs, publish::PublishArgs};
use ghpages_core::{ConfigFile, Gateway, Settings, Verbosity};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ghpages",
    version,
    about = "Publish a documentation directory to a dedicated git branch",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replace the target branch with the current documentation snapshot.
    Publish(PublishArgs),

    /// Print the publish task's name and description.
    Describe(DescribeArgs),
}

// ---------------------------------------------------------------------------
// Shared settings flags
// ---------------------------------------------------------------------------

/// Flags that override `github-pages.yaml`, which overrides the defaults.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Documentation directory, relative to the project root [default: doc]
    #[arg(long, value_name = "DIR")]
    pub doc_dir: Option<PathBuf>,

    /// Project root [default: `git rev-parse --show-toplevel`]
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Repository to publish to [default: URL of the remote in the project root]
    #[arg(long, value_name = "URL")]
    pub repo_url: Option<String>,

    /// Branch that receives the documentation [default: gh-pages]
    #[arg(long = "branch", value_name = "BRANCH")]
    pub branch_name: Option<String>,

    /// Remote name used in the staging repository [default: origin]
    #[arg(long = "remote", value_name = "NAME")]
    pub remote_name: Option<String>,

    /// Scratch directory for the branch checkout; deleted afterwards [default: fresh temp dir]
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Task namespace [default: github-pages]
    #[arg(long, value_name = "NAME")]
    pub namespace: Option<String>,

    /// Config file [default: <project root>/github-pages.yaml, if present]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print nothing unless there is an error.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every git command.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SettingsArgs {
    /// Log level from the flags alone, known before any setting is resolved.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::default()
            .with_quiet(self.quiet)
            .with_verbose(self.verbose)
    }

    /// Defaults, then the config file, then these flags.
    pub fn resolve(&self, gateway: &dyn Gateway) -> Result<Settings> {
        let mut settings = Settings::new();
        if let Some(root) = &self.project_root {
            let root = root
                .canonicalize()
                .with_context(|| format!("cannot resolve project root '{}'", root.display()))?;
            settings.set_project_root(root);
        }

        let config = match &self.config {
            Some(path) => Some(
                ConfigFile::load(path)
                    .with_context(|| format!("failed to load config '{}'", path.display()))?,
            ),
            None => match settings.project_root(gateway) {
                Ok(root) => {
                    let path = ConfigFile::default_path(root);
                    ConfigFile::load_optional(&path)
                        .with_context(|| format!("failed to load config '{}'", path.display()))?
                }
                Err(err) => {
                    tracing::debug!(error = %err, "no project root; skipping config lookup");
                    None
                }
            },
        };
        if let Some(config) = config {
            config.apply_to(&mut settings);
        }

        if let Some(doc_dir) = &self.doc_dir {
            settings.set_doc_dir(doc_dir.clone());
        }
        if let Some(repo_url) = &self.repo_url {
            settings.set_repo_url(repo_url.clone());
        }
        if let Some(branch_name) = &self.branch_name {
            settings.set_branch_name(branch_name.as_str());
        }
        if let Some(remote_name) = &self.remote_name {
            settings.set_remote_name(remote_name.as_str());
        }
        if let Some(staging_dir) = &self.staging_dir {
            settings.set_staging_dir(staging_dir.clone());
        }
        if let Some(namespace) = &self.namespace {
            settings.set_namespace(namespace.clone());
        }
        if self.quiet {
            settings.set_quiet(true);
        }
        if self.verbose {
            settings.set_verbose(true);
        }
        Ok(settings)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logs go to stderr; `RUST_LOG` overrides the level picked from verbosity.
pub(crate) fn init_tracing(verbosity: Verbosity) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Publish(args) => args.run(),
        Commands::Describe(args) => args.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghpages_core::{CommandLine, CommandOutput, FakeGateway};

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ghpages").chain(args.iter().copied()))
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let err = parse(&["publish", "-q", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn flags_override_defaults() {
        let Commands::Publish(args) = parse(&[
            "publish",
            "--repo-url",
            "https://example.com/r.git",
            "--branch",
            "pages",
            "--remote",
            "upstream",
            "--doc-dir",
            "site",
            "--staging-dir",
            "/tmp/stage",
            "--namespace",
            "docs",
            "--verbose",
        ])
        .unwrap()
        .command
        else {
            panic!("expected publish");
        };

        let gw = FakeGateway::new();
        gw.stub(
            &CommandLine::git(["rev-parse", "--show-toplevel"]),
            CommandOutput::failed(128, "fatal: not a git repository"),
        );
        let s = args.settings.resolve(&gw).expect("resolve");
        assert_eq!(s.repo_url(&gw).unwrap(), "https://example.com/r.git");
        assert_eq!(s.branch_name().as_ref(), "pages");
        assert_eq!(s.remote_name().as_ref(), "upstream");
        assert_eq!(s.doc_dir(), std::path::Path::new("site"));
        assert_eq!(s.namespace(), "docs");
        assert!(s.verbose());
    }

    #[test]
    fn log_level_comes_from_raw_flags() {
        let verbose = SettingsArgs {
            verbose: true,
            ..SettingsArgs::default()
        };
        assert_eq!(verbose.verbosity(), Verbosity::Verbose);
        let quiet = SettingsArgs {
            quiet: true,
            ..SettingsArgs::default()
        };
        assert_eq!(quiet.verbosity(), Verbosity::Quiet);
        assert_eq!(SettingsArgs::default().verbosity(), Verbosity::Normal);
    }

    #[test]
    fn missing_project_root_skips_config_lookup() {
        let args = SettingsArgs::default();
        let gw = FakeGateway::new();
        let s = args.resolve(&gw).expect("resolve");
        assert_eq!(s.doc_dir(), std::path::Path::new("doc"));
        assert_eq!(gw.commands(), vec!["git rev-parse --show-toplevel"]);
    }
}
