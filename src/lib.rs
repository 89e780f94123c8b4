//! Matterpost - Mattermost post fetching with terminal link previews.
//!
//! This crate fetches channel posts together with the profiles, statuses
//! and custom emoji they reference, dispatching everything to a store in
//! one batch, and renders Open Graph link previews sized to the screen.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "matterpost";
