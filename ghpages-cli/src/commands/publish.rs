//! `ghpages publish`: copy the doc directory onto the target branch and push.

use anyhow::{Context, Result};
use clap::Args;
use ghpages_core::SystemGateway;
use ghpages_publish::PublishTask;

use crate::{init_tracing, SettingsArgs};

/// Arguments for `ghpages publish`.
#[derive(Args, Debug)]
pub struct PublishArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

impl PublishArgs {
    pub fn run(self) -> Result<()> {
        init_tracing(self.settings.verbosity());
        let gateway = SystemGateway;
        let settings = self.settings.resolve(&gateway)?;

        let task = PublishTask::new(settings);
        let stdout = std::io::stdout();
        task.run(&gateway, &mut stdout.lock())
            .with_context(|| format!("{} failed", task.name()))?;
        Ok(())
    }
}
