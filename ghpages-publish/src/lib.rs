//! # ghpages-publish
//!
//! Publishes a documentation directory to a dedicated branch of a git remote.
//!
//! Call [`Publisher::run`] for the bare sequence, or wrap the settings in a
//! [`PublishTask`] to get the build-tool surface (task name, description,
//! progress header and footer).

pub mod error;
pub mod pipeline;
pub mod task;

pub use error::PublishError;
pub use pipeline::{BranchSource, PublishOutcome, PublishReport, Publisher};
pub use task::PublishTask;
