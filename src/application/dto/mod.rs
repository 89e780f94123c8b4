//! Data transfer objects.

mod posts_dto;

pub use posts_dto::{FetchPostsRequest, POST_CHUNK_SIZE, PostsCursor};
