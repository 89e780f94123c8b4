//! Domain layer with core entities, update events and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Store update events.
pub mod events;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{Post, PostList};
pub use errors::{ApiError, HostError};
pub use events::StoreAction;
pub use ports::{ChatApiPort, ImageProbePort, StorePort, UiHostPort};
