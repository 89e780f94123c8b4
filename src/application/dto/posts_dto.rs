//! Post fetch DTOs.

use crate::domain::entities::ChannelId;

/// Number of posts requested per page unless stated otherwise.
pub const POST_CHUNK_SIZE: u32 = 60;

/// Which slice of a channel's timeline to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostsCursor {
    /// A page counted from the newest post.
    Page {
        /// Zero-based page index.
        page: u32,
        /// Page size.
        per_page: u32,
    },
    /// Everything created or edited after a timestamp (epoch milliseconds).
    Since(i64),
}

impl Default for PostsCursor {
    fn default() -> Self {
        Self::Page {
            page: 0,
            per_page: POST_CHUNK_SIZE,
        }
    }
}

impl std::fmt::Display for PostsCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Page { page, per_page } => write!(f, "page {page} ({per_page} per page)"),
            Self::Since(since) => write!(f, "since {since}"),
        }
    }
}

/// Request to fetch a channel's posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPostsRequest {
    /// Channel to read.
    pub channel_id: ChannelId,
    /// Timeline slice.
    pub cursor: PostsCursor,
}

impl FetchPostsRequest {
    /// Requests a page of posts.
    #[must_use]
    pub fn page(channel_id: impl Into<ChannelId>, page: u32, per_page: u32) -> Self {
        Self {
            channel_id: channel_id.into(),
            cursor: PostsCursor::Page { page, per_page },
        }
    }

    /// Requests posts changed since `since`.
    #[must_use]
    pub fn since(channel_id: impl Into<ChannelId>, since: i64) -> Self {
        Self {
            channel_id: channel_id.into(),
            cursor: PostsCursor::Since(since),
        }
    }
}
