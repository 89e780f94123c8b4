//! Chat server API port.

use async_trait::async_trait;

use crate::domain::entities::{
    ChannelId, CustomEmoji, OpenGraphMetadata, PostId, PostList, UserId, UserProfile, UserStatus,
};
use crate::domain::errors::ApiError;

/// Response of an interactive post action.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct PostActionResponse {
    /// Set when the integration wants to open an interactive dialog.
    #[serde(default)]
    pub trigger_id: Option<String>,
}

/// Port for the chat server REST API.
#[async_trait]
pub trait ChatApiPort: Send + Sync {
    /// Fetches the profile of the signed-in user.
    async fn get_me(&self) -> Result<UserProfile, ApiError>;

    /// Fetches one page of a channel's posts, newest first.
    async fn get_posts(
        &self,
        channel_id: &ChannelId,
        page: u32,
        per_page: u32,
    ) -> Result<PostList, ApiError>;

    /// Fetches posts created or edited after `since` (epoch milliseconds).
    async fn get_posts_since(&self, channel_id: &ChannelId, since: i64)
    -> Result<PostList, ApiError>;

    /// Fetches profiles by user id.
    async fn get_profiles_by_ids(&self, user_ids: &[UserId]) -> Result<Vec<UserProfile>, ApiError>;

    /// Fetches profiles by username.
    async fn get_profiles_by_usernames(
        &self,
        usernames: &[String],
    ) -> Result<Vec<UserProfile>, ApiError>;

    /// Fetches presence statuses by user id.
    async fn get_statuses_by_ids(&self, user_ids: &[UserId]) -> Result<Vec<UserStatus>, ApiError>;

    /// Fetches custom emoji by name. Unknown names are simply absent.
    async fn get_custom_emojis_by_names(
        &self,
        names: &[String],
    ) -> Result<Vec<CustomEmoji>, ApiError>;

    /// Fetches scraped Open Graph metadata for a link.
    async fn get_open_graph_metadata(&self, url: &str) -> Result<OpenGraphMetadata, ApiError>;

    /// Runs an interactive message action.
    async fn do_post_action(
        &self,
        post_id: &PostId,
        action_id: &str,
        selected_option: &str,
    ) -> Result<PostActionResponse, ApiError>;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::*;

    /// Call recorded by [`MockChatApi`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ApiCall {
        GetMe,
        GetPosts { channel_id: ChannelId, page: u32, per_page: u32 },
        GetPostsSince { channel_id: ChannelId, since: i64 },
        ProfilesByIds(Vec<UserId>),
        ProfilesByUsernames(Vec<String>),
        StatusesByIds(Vec<UserId>),
        CustomEmojisByNames(Vec<String>),
        OpenGraph(String),
        PostAction { post_id: PostId, action_id: String, selected_option: String },
    }

    /// In-memory chat API for testing.
    #[derive(Default)]
    pub struct MockChatApi {
        me: Option<UserProfile>,
        posts: Mutex<Option<Result<PostList, ApiError>>>,
        profiles: Vec<UserProfile>,
        statuses: Vec<UserStatus>,
        emojis: Vec<CustomEmoji>,
        open_graph: HashMap<String, OpenGraphMetadata>,
        trigger_id: Option<String>,
        enrichment_error: Option<ApiError>,
        calls: Mutex<Vec<ApiCall>>,
    }

    impl MockChatApi {
        /// Creates a mock serving an empty page.
        pub fn new() -> Self {
            Self::default()
        }

        /// Signed-in user.
        pub fn with_me(mut self, me: UserProfile) -> Self {
            self.me = Some(me);
            self
        }

        /// Serves `posts` from both posts endpoints.
        pub fn with_posts(self, posts: PostList) -> Self {
            *self.posts.lock() = Some(Ok(posts));
            self
        }

        /// Fails both posts endpoints.
        pub fn with_posts_error(self, error: ApiError) -> Self {
            *self.posts.lock() = Some(Err(error));
            self
        }

        /// Known profiles.
        pub fn with_profiles(mut self, profiles: Vec<UserProfile>) -> Self {
            self.profiles = profiles;
            self
        }

        /// Known statuses.
        pub fn with_statuses(mut self, statuses: Vec<UserStatus>) -> Self {
            self.statuses = statuses;
            self
        }

        /// Known custom emoji.
        pub fn with_emojis(mut self, emojis: Vec<CustomEmoji>) -> Self {
            self.emojis = emojis;
            self
        }

        /// Open Graph metadata served for `url`.
        pub fn with_open_graph(mut self, url: &str, data: OpenGraphMetadata) -> Self {
            self.open_graph.insert(url.to_string(), data);
            self
        }

        /// Trigger id returned by post actions.
        pub fn with_trigger_id(mut self, trigger_id: &str) -> Self {
            self.trigger_id = Some(trigger_id.to_string());
            self
        }

        /// Makes every profile and status lookup fail.
        pub fn with_enrichment_error(mut self, error: ApiError) -> Self {
            self.enrichment_error = Some(error);
            self
        }

        /// Calls received so far.
        pub fn calls(&self) -> Vec<ApiCall> {
            self.calls.lock().clone()
        }

        fn record(&self, call: ApiCall) {
            self.calls.lock().push(call);
        }

        fn page(&self) -> Result<PostList, ApiError> {
            self.posts.lock().clone().unwrap_or_else(|| Ok(PostList::default()))
        }

        fn enrichment<T>(&self, value: T) -> Result<T, ApiError> {
            match &self.enrichment_error {
                Some(error) => Err(error.clone()),
                None => Ok(value),
            }
        }
    }

    #[async_trait]
    impl ChatApiPort for MockChatApi {
        async fn get_me(&self) -> Result<UserProfile, ApiError> {
            self.record(ApiCall::GetMe);
            self.me
                .clone()
                .ok_or_else(|| ApiError::unauthorized("not signed in"))
        }

        async fn get_posts(
            &self,
            channel_id: &ChannelId,
            page: u32,
            per_page: u32,
        ) -> Result<PostList, ApiError> {
            self.record(ApiCall::GetPosts {
                channel_id: channel_id.clone(),
                page,
                per_page,
            });
            self.page()
        }

        async fn get_posts_since(
            &self,
            channel_id: &ChannelId,
            since: i64,
        ) -> Result<PostList, ApiError> {
            self.record(ApiCall::GetPostsSince {
                channel_id: channel_id.clone(),
                since,
            });
            self.page()
        }

        async fn get_profiles_by_ids(
            &self,
            user_ids: &[UserId],
        ) -> Result<Vec<UserProfile>, ApiError> {
            self.record(ApiCall::ProfilesByIds(user_ids.to_vec()));
            self.enrichment(
                self.profiles
                    .iter()
                    .filter(|p| user_ids.contains(p.id()))
                    .cloned()
                    .collect(),
            )
        }

        async fn get_profiles_by_usernames(
            &self,
            usernames: &[String],
        ) -> Result<Vec<UserProfile>, ApiError> {
            self.record(ApiCall::ProfilesByUsernames(usernames.to_vec()));
            self.enrichment(
                self.profiles
                    .iter()
                    .filter(|p| usernames.iter().any(|u| u == p.username()))
                    .cloned()
                    .collect(),
            )
        }

        async fn get_statuses_by_ids(
            &self,
            user_ids: &[UserId],
        ) -> Result<Vec<UserStatus>, ApiError> {
            self.record(ApiCall::StatusesByIds(user_ids.to_vec()));
            self.enrichment(
                self.statuses
                    .iter()
                    .filter(|s| user_ids.contains(&s.user_id))
                    .cloned()
                    .collect(),
            )
        }

        async fn get_custom_emojis_by_names(
            &self,
            names: &[String],
        ) -> Result<Vec<CustomEmoji>, ApiError> {
            self.record(ApiCall::CustomEmojisByNames(names.to_vec()));
            Ok(self
                .emojis
                .iter()
                .filter(|e| names.contains(&e.name))
                .cloned()
                .collect())
        }

        async fn get_open_graph_metadata(&self, url: &str) -> Result<OpenGraphMetadata, ApiError> {
            self.record(ApiCall::OpenGraph(url.to_string()));
            self.open_graph
                .get(url)
                .cloned()
                .ok_or_else(|| ApiError::status(404, "no metadata"))
        }

        async fn do_post_action(
            &self,
            post_id: &PostId,
            action_id: &str,
            selected_option: &str,
        ) -> Result<PostActionResponse, ApiError> {
            self.record(ApiCall::PostAction {
                post_id: post_id.clone(),
                action_id: action_id.to_string(),
                selected_option: selected_option.to_string(),
            });
            Ok(PostActionResponse {
                trigger_id: self.trigger_id.clone(),
            })
        }
    }
}
