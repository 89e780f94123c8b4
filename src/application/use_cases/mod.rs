//! Use case implementations.

mod fetch_posts_use_case;
mod link_preview_use_case;
mod post_actions_use_case;

pub use fetch_posts_use_case::{FetchPostsUseCase, NeededData};
pub use link_preview_use_case::{LinkPreviewUseCase, ProbeOutcome};
pub use post_actions_use_case::PostActionsUseCase;
