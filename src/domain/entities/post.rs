use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ChannelId, ImageMetadataCache, OpenGraphMetadata, PostId, UserId};
use crate::domain::serde_utils::empty_string_as_none;

/// Post type derived from the wire `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum PostKind {
    #[default]
    Regular,
    Ephemeral,
    EphemeralAddToChannel,
    JoinChannel,
    LeaveChannel,
    AddToChannel,
    RemoveFromChannel,
    HeaderChange,
    PurposeChange,
    OtherSystem,
}

impl PostKind {
    /// Wire tag for client-synthesized add-to-channel notices.
    pub const EPHEMERAL_ADD_TO_CHANNEL: &'static str = "system_ephemeral_add_to_channel";

    /// Returns the wire tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "",
            Self::Ephemeral => "system_ephemeral",
            Self::EphemeralAddToChannel => Self::EPHEMERAL_ADD_TO_CHANNEL,
            Self::JoinChannel => "system_join_channel",
            Self::LeaveChannel => "system_leave_channel",
            Self::AddToChannel => "system_add_to_channel",
            Self::RemoveFromChannel => "system_remove_from_channel",
            Self::HeaderChange => "system_header_change",
            Self::PurposeChange => "system_purpose_change",
            Self::OtherSystem => "system_generic",
        }
    }

    /// Returns true for client-only posts that are never persisted.
    #[must_use]
    pub const fn is_ephemeral(self) -> bool {
        matches!(self, Self::Ephemeral | Self::EphemeralAddToChannel)
    }

    /// Returns true for anything other than a regular user post.
    #[must_use]
    pub const fn is_system(self) -> bool {
        !matches!(self, Self::Regular)
    }
}

impl From<&str> for PostKind {
    fn from(value: &str) -> Self {
        match value {
            "" => Self::Regular,
            "system_ephemeral" => Self::Ephemeral,
            Self::EPHEMERAL_ADD_TO_CHANNEL => Self::EphemeralAddToChannel,
            "system_join_channel" => Self::JoinChannel,
            "system_leave_channel" => Self::LeaveChannel,
            "system_add_to_channel" => Self::AddToChannel,
            "system_remove_from_channel" => Self::RemoveFromChannel,
            "system_header_change" => Self::HeaderChange,
            "system_purpose_change" => Self::PurposeChange,
            other if other.starts_with("system_") => Self::OtherSystem,
            _ => Self::Regular,
        }
    }
}

/// Embed attached to a post by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostEmbed {
    /// Embed type, e.g. `opengraph` or `image`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Embedded URL.
    #[serde(default)]
    pub url: String,
    /// Type specific payload.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Server computed metadata attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PostMetadata {
    /// Embeds found in the message.
    #[serde(default)]
    pub embeds: Vec<PostEmbed>,
    /// Dimensions of the images referenced by the post, keyed by URL.
    #[serde(default)]
    pub images: ImageMetadataCache,
}

impl PostMetadata {
    /// Returns the Open Graph data embedded for `url`, if any.
    #[must_use]
    pub fn open_graph_for(&self, url: &str) -> Option<OpenGraphMetadata> {
        self.embeds
            .iter()
            .filter(|e| e.kind == "opengraph" && e.url == url)
            .find_map(|e| e.data.clone())
            .and_then(|data| serde_json::from_value(data).ok())
    }
}

/// A chat post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    id: PostId,
    user_id: UserId,
    channel_id: ChannelId,
    #[serde(default)]
    create_at: i64,
    #[serde(default)]
    update_at: i64,
    #[serde(default)]
    message: String,
    #[serde(default, with = "empty_string_as_none")]
    root_id: Option<PostId>,
    #[serde(default, with = "empty_string_as_none")]
    parent_id: Option<PostId>,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    props: Map<String, Value>,
    #[serde(default)]
    metadata: PostMetadata,
}

#[allow(missing_docs)]
impl Post {
    #[must_use]
    pub fn new(
        id: impl Into<PostId>,
        user_id: impl Into<UserId>,
        channel_id: impl Into<ChannelId>,
        message: impl Into<String>,
        create_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            create_at,
            update_at: create_at,
            message: message.into(),
            root_id: None,
            parent_id: None,
            kind: String::new(),
            props: Map::new(),
            metadata: PostMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: PostKind) -> Self {
        self.kind = kind.as_str().to_string();
        self
    }

    /// Links the post into a thread. An empty root clears the linkage.
    #[must_use]
    pub fn with_root(mut self, root_id: Option<PostId>) -> Self {
        let root_id = root_id.filter(|id| !id.is_empty());
        self.parent_id.clone_from(&root_id);
        self.root_id = root_id;
        self
    }

    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: PostMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub const fn id(&self) -> &PostId {
        &self.id
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub const fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn create_at(&self) -> i64 {
        self.create_at
    }

    #[must_use]
    pub const fn update_at(&self) -> i64 {
        self.update_at
    }

    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.create_at).single()
    }

    #[must_use]
    pub const fn root_id(&self) -> Option<&PostId> {
        self.root_id.as_ref()
    }

    #[must_use]
    pub const fn parent_id(&self) -> Option<&PostId> {
        self.parent_id.as_ref()
    }

    #[must_use]
    pub fn kind(&self) -> PostKind {
        PostKind::from(self.kind.as_str())
    }

    #[must_use]
    pub fn type_tag(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub const fn props(&self) -> &Map<String, Value> {
        &self.props
    }

    #[must_use]
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub const fn metadata(&self) -> &PostMetadata {
        &self.metadata
    }

    #[must_use]
    pub const fn is_reply(&self) -> bool {
        self.root_id.is_some()
    }
}

/// A page of posts as returned by the posts endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PostList {
    /// Post ids, newest first.
    #[serde(default)]
    pub order: Vec<PostId>,
    /// Posts keyed by id.
    #[serde(default)]
    pub posts: HashMap<PostId, Post>,
    /// Id of the next (newer) post outside this page; empty when none.
    #[serde(default)]
    pub next_post_id: Option<String>,
    /// Id of the previous (older) post outside this page; empty when none.
    /// Absent when the server does not report paging.
    #[serde(default)]
    pub prev_post_id: Option<String>,
}

impl PostList {
    /// Builds a list from posts given newest first.
    #[must_use]
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let order = posts.iter().map(|p| p.id().clone()).collect();
        let posts = posts.into_iter().map(|p| (p.id().clone(), p)).collect();
        Self {
            order,
            posts,
            next_post_id: Some(String::new()),
            prev_post_id: Some(String::new()),
        }
    }

    /// Returns true when the page carries no posts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Number of posts in the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Returns true when the server reports nothing older than this page.
    ///
    /// A missing `prev_post_id` says nothing about older posts.
    #[must_use]
    pub fn reached_oldest(&self) -> bool {
        self.prev_post_id.as_deref() == Some("")
    }

    /// Posts following `order`, then any posts missing from it.
    #[must_use]
    pub fn posts_in_order(&self) -> Vec<&Post> {
        let mut result: Vec<&Post> = self
            .order
            .iter()
            .filter_map(|id| self.posts.get(id))
            .collect();

        let mut rest: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| !self.order.contains(p.id()))
            .collect();
        rest.sort_by(|a, b| b.create_at.cmp(&a.create_at).then_with(|| a.id.cmp(&b.id)));
        result.extend(rest);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE_POST: &str = r#"{
        "id": "p1",
        "user_id": "u1",
        "channel_id": "c1",
        "create_at": 1700000000000,
        "update_at": 1700000000500,
        "message": "hello @bob",
        "root_id": "",
        "parent_id": "",
        "type": "",
        "props": {},
        "metadata": {
            "images": {
                "https://example.com/b.png": {"width": 10, "height": 20},
                "https://example.com/a.png": {"width": 30, "height": 40}
            }
        }
    }"#;

    #[test]
    fn test_post_from_wire() {
        let post: Post = serde_json::from_str(WIRE_POST).unwrap();

        assert_eq!(post.id().as_str(), "p1");
        assert_eq!(post.kind(), PostKind::Regular);
        assert!(post.root_id().is_none());
        assert!(!post.is_reply());
        assert_eq!(post.created().unwrap().timestamp(), 1_700_000_000);

        let urls: Vec<&str> = post.metadata().images.urls().collect();
        assert_eq!(
            urls,
            vec!["https://example.com/b.png", "https://example.com/a.png"]
        );
    }

    #[test]
    fn test_post_kind_from_tag() {
        assert_eq!(
            PostKind::from("system_ephemeral_add_to_channel"),
            PostKind::EphemeralAddToChannel
        );
        assert_eq!(PostKind::from("system_something_new"), PostKind::OtherSystem);
        assert_eq!(PostKind::from("custom_plugin"), PostKind::Regular);
        assert!(PostKind::EphemeralAddToChannel.is_ephemeral());
        assert!(PostKind::JoinChannel.is_system());
        assert!(!PostKind::JoinChannel.is_ephemeral());
    }

    #[test]
    fn test_with_root_sets_parent() {
        let post = Post::new("p2", "u1", "c1", "reply", 1).with_root(Some(PostId::new("p1")));
        assert_eq!(post.root_id().map(PostId::as_str), Some("p1"));
        assert_eq!(post.parent_id().map(PostId::as_str), Some("p1"));

        let post = Post::new("p3", "u1", "c1", "top", 1).with_root(Some(PostId::new("")));
        assert!(post.root_id().is_none());
    }

    #[test]
    fn test_open_graph_embed_lookup() {
        let json = r#"{
            "embeds": [
                {"type": "opengraph", "url": "https://example.com", "data": {"title": "Example", "images": []}}
            ]
        }"#;
        let metadata: PostMetadata = serde_json::from_str(json).unwrap();

        let og = metadata.open_graph_for("https://example.com").unwrap();
        assert_eq!(og.title.as_deref(), Some("Example"));
        assert!(metadata.open_graph_for("https://other.com").is_none());
    }

    #[test]
    fn test_posts_in_order_follows_order_then_rest() {
        let mut list = PostList::from_posts(vec![
            Post::new("p3", "u1", "c1", "c", 3),
            Post::new("p2", "u1", "c1", "b", 2),
        ]);
        let extra = Post::new("p1", "u1", "c1", "a", 1);
        list.posts.insert(extra.id().clone(), extra);

        let ids: Vec<&str> = list.posts_in_order().iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["p3", "p2", "p1"]);
        assert!(list.reached_oldest());
    }

    #[test]
    fn test_reached_oldest_needs_empty_prev_post_id() {
        let list: PostList = serde_json::from_str(r#"{"order": [], "posts": {}}"#).unwrap();
        assert!(!list.reached_oldest());

        let list: PostList =
            serde_json::from_str(r#"{"order": [], "posts": {}, "prev_post_id": ""}"#).unwrap();
        assert!(list.reached_oldest());

        let list: PostList =
            serde_json::from_str(r#"{"order": [], "posts": {}, "prev_post_id": "p0"}"#).unwrap();
        assert!(!list.reached_oldest());
    }
}
