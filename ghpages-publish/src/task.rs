//! The publish task as a build tool sees it: a name, a one-line description,
//! and a run that prints a progress header and a `SUCCESS` footer.

use std::io::Write;

use ghpages_core::{Gateway, Settings};

use crate::error::PublishError;
use crate::pipeline::{PublishReport, Publisher};

/// A configured `<namespace>:publish` task.
#[derive(Debug, Clone, Default)]
pub struct PublishTask {
    settings: Settings,
}

impl PublishTask {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start from defaults and let `setup` adjust them before the task runs.
    pub fn configure(setup: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = Settings::new();
        setup(&mut settings);
        Self::new(settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// `<namespace>:publish`
    pub fn name(&self) -> String {
        self.settings.task_name()
    }

    pub fn description(&self, gateway: &dyn Gateway) -> Result<String, PublishError> {
        Ok(self.settings.description(gateway)?)
    }

    /// Print the header, publish, print the footer.
    ///
    /// Quiet suppresses both header and footer. Verbose ends the header line
    /// so the log output that follows starts on its own line. On error nothing
    /// more is printed; the error is returned.
    pub fn run(
        &self,
        gateway: &dyn Gateway,
        out: &mut dyn Write,
    ) -> Result<PublishReport, PublishError> {
        self.display_header(gateway, out)?;
        let report = Publisher::new(&self.settings, gateway).run()?;
        self.display_footer(out)?;
        Ok(report)
    }

    fn display_header(&self, gateway: &dyn Gateway, out: &mut dyn Write) -> Result<(), PublishError> {
        if !self.settings.quiet() {
            write!(
                out,
                "Publishing {} to {}#{}...",
                self.settings.doc_dir().display(),
                self.settings.repo_url(gateway)?,
                self.settings.branch_name()
            )
            .map_err(PublishError::Output)?;
        }
        if self.settings.verbose() {
            writeln!(out).map_err(PublishError::Output)?;
        }
        out.flush().map_err(PublishError::Output)
    }

    fn display_footer(&self, out: &mut dyn Write) -> Result<(), PublishError> {
        if !self.settings.quiet() {
            writeln!(out, "SUCCESS").map_err(PublishError::Output)?;
        }
        Ok(())
    }
}
