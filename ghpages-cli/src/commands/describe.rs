//! `ghpages describe`: show what `publish` would do without touching anything.

use anyhow::{Context, Result};
use clap::Args;
use ghpages_core::{Gateway, SystemGateway};
use ghpages_publish::PublishTask;
use serde::Serialize;

use crate::{init_tracing, SettingsArgs};

/// Arguments for `ghpages describe`.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print the resolved settings as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Description<'a> {
    name: String,
    description: String,
    doc_dir: String,
    repo_url: &'a str,
    branch_name: &'a str,
    remote_name: &'a str,
    namespace: &'a str,
}

impl DescribeArgs {
    pub fn run(self) -> Result<()> {
        init_tracing(self.settings.verbosity());
        let gateway = SystemGateway;
        let settings = self.settings.resolve(&gateway)?;

        let task = PublishTask::new(settings);
        if self.json {
            let description = describe(&task, &gateway)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&description).context("failed to encode JSON")?
            );
        } else {
            let description = task
                .description(&gateway)
                .context("cannot describe publish task")?;
            println!("{}  # {}", task.name(), description);
        }
        Ok(())
    }
}

fn describe<'a>(task: &'a PublishTask, gateway: &dyn Gateway) -> Result<Description<'a>> {
    let settings = task.settings();
    Ok(Description {
        name: task.name(),
        description: task
            .description(gateway)
            .context("cannot describe publish task")?,
        doc_dir: settings.doc_dir().display().to_string(),
        repo_url: settings
            .repo_url(gateway)
            .context("cannot determine repository URL")?,
        branch_name: settings.branch_name().as_ref(),
        remote_name: settings.remote_name().as_ref(),
        namespace: settings.namespace(),
    })
}
