//! Error types for ghpages-publish.

use thiserror::Error;

use ghpages_core::{GatewayError, SettingsError};

/// All errors that can abort a publish run.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A derived setting (project root, repo URL, staging dir) could not be
    /// resolved.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A git command or filesystem operation failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The header or footer could not be written.
    #[error("failed to write task output: {0}")]
    Output(#[source] std::io::Error),
}
