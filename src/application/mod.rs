//! Application layer with use cases, services and DTOs.

/// Data transfer objects.
pub mod dto;
/// Stateless post and preview logic.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{FetchPostsRequest, POST_CHUNK_SIZE, PostsCursor};
pub use use_cases::{FetchPostsUseCase, LinkPreviewUseCase, PostActionsUseCase, ProbeOutcome};
