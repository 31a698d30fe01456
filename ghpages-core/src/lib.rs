//! ghpages core library: settings, the gateway boundary, errors.
//!
//! - [`settings`]: [`Settings`], lazily resolved per-run configuration
//! - [`gateway`]: [`Gateway`] trait, [`CommandLine`], [`CommandOutput`]
//! - [`system`]: [`SystemGateway`], the real implementation
//! - [`fake`]: [`FakeGateway`], a recording test double
//! - [`workdir`]: scoped working-directory changes
//! - [`config`]: optional `github-pages.yaml`
//! - [`error`]: [`GatewayError`], [`SettingsError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod fake;
pub mod gateway;
pub mod settings;
pub mod system;
pub mod types;
pub mod workdir;

pub use config::ConfigFile;
pub use error::{ConfigError, GatewayError, SettingsError};
pub use fake::FakeGateway;
pub use gateway::{CommandLine, CommandOutput, Gateway};
pub use settings::Settings;
pub use system::SystemGateway;
pub use types::{BranchName, RemoteName, Verbosity};
pub use workdir::{with_working_dir, WorkingDirGuard};
