//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Desktop host actions.
pub mod host;
/// Image measuring.
pub mod image;
/// Mattermost API client.
pub mod mattermost;
/// In-memory chat state.
pub mod store;

pub use config::{AppConfig, CliArgs, Command, LogLevel, StorageManager};
pub use host::SystemUiHost;
pub use self::image::{HttpImageProbe, ImageProbeConfig};
pub use mattermost::MattermostClient;
pub use store::ChatStore;
