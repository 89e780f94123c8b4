//! Channel post fetching with batched enrichment.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{FetchPostsRequest, PostsCursor};
use crate::application::services::emoji::emoji_names_in_posts;
use crate::application::services::mentions::needed_at_mentioned_usernames;
use crate::domain::entities::{ChannelId, Post, PostList, UserId, UserProfile};
use crate::domain::errors::ApiError;
use crate::domain::events::StoreAction;
use crate::domain::ports::{ChatApiPort, StorePort};

/// Auxiliary data the fetched posts refer to but the store lacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeededData {
    /// Authors without a loaded profile, never the current user.
    pub user_ids: Vec<UserId>,
    /// Mentioned usernames without a loaded profile.
    pub usernames: Vec<String>,
    /// Authors without a loaded status.
    pub statuses: Vec<UserId>,
}

impl NeededData {
    /// Returns true if nothing has to be fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty() && self.usernames.is_empty() && self.statuses.is_empty()
    }
}

/// Fetches channel posts and the profiles, statuses and emoji they reference.
#[derive(Clone)]
pub struct FetchPostsUseCase {
    api: Arc<dyn ChatApiPort>,
    store: Arc<dyn StorePort>,
    custom_emoji_enabled: bool,
}

impl FetchPostsUseCase {
    /// Creates new fetch posts use case.
    #[must_use]
    pub fn new(api: Arc<dyn ChatApiPort>, store: Arc<dyn StorePort>) -> Self {
        Self {
            api,
            store,
            custom_emoji_enabled: true,
        }
    }

    /// Enables or disables custom emoji loading.
    #[must_use]
    pub const fn with_custom_emoji(mut self, enabled: bool) -> Self {
        self.custom_emoji_enabled = enabled;
        self
    }

    /// Fetches a page of posts.
    ///
    /// # Errors
    /// Returns error if the posts request fails.
    pub async fn get_posts(
        &self,
        channel_id: impl Into<ChannelId>,
        page: u32,
        per_page: u32,
    ) -> Result<PostList, ApiError> {
        self.execute(FetchPostsRequest::page(channel_id, page, per_page))
            .await
    }

    /// Fetches posts created or edited since `since`.
    ///
    /// # Errors
    /// Returns error if the posts request fails.
    pub async fn get_posts_since(
        &self,
        channel_id: impl Into<ChannelId>,
        since: i64,
    ) -> Result<PostList, ApiError> {
        self.execute(FetchPostsRequest::since(channel_id, since))
            .await
    }

    /// Executes the fetch.
    ///
    /// A non-empty page is dispatched as one batch holding the posts, their
    /// placement in the channel and whatever enrichment succeeded. An empty
    /// page dispatches nothing.
    ///
    /// # Errors
    /// Returns error if the posts request fails; nothing is dispatched then.
    pub async fn execute(&self, request: FetchPostsRequest) -> Result<PostList, ApiError> {
        let FetchPostsRequest { channel_id, cursor } = request;
        debug!(channel_id = %channel_id, cursor = %cursor, "Fetching posts");

        let result = match cursor {
            PostsCursor::Page { page, per_page } => {
                self.api.get_posts(&channel_id, page, per_page).await
            }
            PostsCursor::Since(since) => self.api.get_posts_since(&channel_id, since).await,
        };

        let data = result.map_err(|e| {
            warn!(channel_id = %channel_id, error = %e, "Failed to fetch posts");
            e
        })?;

        if data.is_empty() {
            debug!(channel_id = %channel_id, "No posts returned");
            return Ok(data);
        }

        let placement = match cursor {
            PostsCursor::Page { page, .. } => StoreAction::ReceivedPostsInChannel {
                channel_id: channel_id.clone(),
                order: data.order.clone(),
                recent: page == 0,
                oldest: data.reached_oldest(),
            },
            PostsCursor::Since(_) => StoreAction::ReceivedPostsSince {
                channel_id: channel_id.clone(),
                order: data.order.clone(),
            },
        };

        let mut actions = vec![StoreAction::ReceivedPosts(data.clone()), placement];
        actions.extend(self.additional_data_batch(&data).await);

        self.store.dispatch(StoreAction::batch(actions));

        info!(channel_id = %channel_id, count = data.len(), "Posts received");
        Ok(data)
    }

    /// Works out which profiles and statuses the posts need.
    #[must_use]
    pub fn needed_data(&self, posts: &[&Post]) -> NeededData {
        let current_user = self.store.current_user_id();

        let mut user_ids = BTreeSet::new();
        let mut statuses = BTreeSet::new();

        for post in posts {
            let user_id = post.user_id();

            if !self.store.has_status(user_id) {
                statuses.insert(user_id.clone());
            }

            if current_user.as_ref() == Some(user_id) {
                continue;
            }

            if !self.store.has_profile(user_id) {
                user_ids.insert(user_id.clone());
            }
        }

        NeededData {
            user_ids: user_ids.into_iter().collect(),
            usernames: needed_at_mentioned_usernames(self.store.as_ref(), posts)
                .into_iter()
                .collect(),
            statuses: statuses.into_iter().collect(),
        }
    }

    async fn additional_data_batch(&self, data: &PostList) -> Vec<StoreAction> {
        let posts = data.posts_in_order();
        if posts.is_empty() {
            return Vec::new();
        }

        self.load_emojis_in_background(&posts);

        let needed = self.needed_data(&posts);
        if needed.is_empty() {
            return Vec::new();
        }

        match self.fetch_needed(&needed).await {
            Ok(actions) => actions,
            Err(e) => {
                debug!(error = %e, "Post enrichment failed, keeping posts without it");
                Vec::new()
            }
        }
    }

    async fn fetch_needed(&self, needed: &NeededData) -> Result<Vec<StoreAction>, ApiError> {
        let by_ids = async {
            if needed.user_ids.is_empty() {
                Ok(Vec::new())
            } else {
                self.api.get_profiles_by_ids(&needed.user_ids).await
            }
        };
        let by_usernames = async {
            if needed.usernames.is_empty() {
                Ok(Vec::new())
            } else {
                self.api.get_profiles_by_usernames(&needed.usernames).await
            }
        };
        let statuses = async {
            if needed.statuses.is_empty() {
                Ok(Vec::new())
            } else {
                self.api.get_statuses_by_ids(&needed.statuses).await
            }
        };

        let (by_ids, by_usernames, statuses) = tokio::try_join!(by_ids, by_usernames, statuses)?;

        let mut actions = Vec::new();

        let profiles = self.merge_profiles(by_ids, by_usernames);
        if !profiles.is_empty() {
            actions.push(StoreAction::ReceivedProfilesList(profiles));
        }

        if !statuses.is_empty() {
            actions.push(StoreAction::ReceivedStatuses(statuses));
        }

        Ok(actions)
    }

    fn merge_profiles(
        &self,
        by_ids: Vec<UserProfile>,
        by_usernames: Vec<UserProfile>,
    ) -> Vec<UserProfile> {
        let current_user = self.store.current_user_id();
        let mut seen = HashSet::new();

        by_ids
            .into_iter()
            .chain(by_usernames)
            .filter(|p| current_user.as_ref() != Some(p.id()))
            .filter(|p| seen.insert(p.id().clone()))
            .collect()
    }

    fn load_emojis_in_background(&self, posts: &[&Post]) {
        if !self.custom_emoji_enabled {
            return;
        }

        let names: Vec<String> = emoji_names_in_posts(posts)
            .into_iter()
            .filter(|name| !self.store.knows_emoji(name))
            .collect();

        if names.is_empty() {
            return;
        }

        let this = self.clone();
        tokio::spawn(async move {
            this.load_custom_emojis(&names).await;
        });
    }

    /// Loads custom emoji by name and records the ones that do not exist.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn load_custom_emojis(&self, names: &[String]) {
        debug!(count = names.len(), "Loading custom emoji");

        let emojis = match self.api.get_custom_emojis_by_names(names).await {
            Ok(emojis) => emojis,
            Err(e) => {
                debug!(error = %e, "Failed to load custom emoji");
                return;
            }
        };

        let missing: Vec<String> = names
            .iter()
            .filter(|name| !emojis.iter().any(|e| &e.name == *name))
            .cloned()
            .collect();

        let mut actions = Vec::new();
        if !emojis.is_empty() {
            actions.push(StoreAction::ReceivedCustomEmojis(emojis));
        }
        if !missing.is_empty() {
            actions.push(StoreAction::CustomEmojisNotFound(missing));
        }

        if !actions.is_empty() {
            self.store.dispatch(StoreAction::batch(actions));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CustomEmoji, PresenceStatus, UserStatus};
    use crate::domain::ports::mocks::{ApiCall, MockChatApi, RecordingStore};

    fn page(posts: Vec<Post>) -> PostList {
        PostList::from_posts(posts)
    }

    fn use_case(api: &Arc<MockChatApi>, store: &Arc<RecordingStore>) -> FetchPostsUseCase {
        FetchPostsUseCase::new(api.clone(), store.clone())
    }

    fn kinds(action: &StoreAction) -> Vec<&'static str> {
        action.flatten().iter().map(|a| a.kind()).collect()
    }

    async fn wait_for_dispatches(store: &RecordingStore, count: usize) {
        for _ in 0..50 {
            if store.dispatched().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_empty_page_dispatches_nothing() {
        let api = Arc::new(MockChatApi::new().with_posts(PostList::default()));
        let store = Arc::new(RecordingStore::new("me"));

        let result = use_case(&api, &store).get_posts("c1", 0, 60).await;

        assert!(result.unwrap().is_empty());
        assert!(store.dispatched().is_empty());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_page_is_dispatched_as_single_batch() {
        let api = Arc::new(
            MockChatApi::new()
                .with_posts(page(vec![
                    Post::new("p3", "me", "c1", "mine", 3),
                    Post::new("p2", "u2", "c1", "ping @dave", 2),
                    Post::new("p1", "u3", "c1", "hello", 1),
                ]))
                .with_profiles(vec![
                    UserProfile::new("u2", "bob"),
                    UserProfile::new("u4", "dave"),
                ])
                .with_statuses(vec![
                    UserStatus::new("me", PresenceStatus::Online),
                    UserStatus::new("u3", PresenceStatus::Away),
                ]),
        );
        let store = Arc::new(
            RecordingStore::new("me")
                .with_profile("u3", "carol")
                .with_status("u2"),
        );

        let list = use_case(&api, &store).get_posts("c1", 0, 60).await.unwrap();
        assert_eq!(list.len(), 3);

        let dispatched = store.dispatched();
        assert_eq!(dispatched.len(), 1);
        assert_eq!(
            kinds(&dispatched[0]),
            vec![
                "RECEIVED_POSTS",
                "RECEIVED_POSTS_IN_CHANNEL",
                "RECEIVED_PROFILES_LIST",
                "RECEIVED_STATUSES"
            ]
        );

        let calls = api.calls();
        assert!(calls.contains(&ApiCall::ProfilesByIds(vec![UserId::new("u2")])));
        assert!(calls.contains(&ApiCall::ProfilesByUsernames(vec!["dave".to_string()])));
        assert!(calls.contains(&ApiCall::StatusesByIds(vec![
            UserId::new("me"),
            UserId::new("u3")
        ])));

        let leaves = dispatched[0].flatten();
        let Some(StoreAction::ReceivedProfilesList(profiles)) = leaves
            .iter()
            .find(|a| matches!(a, StoreAction::ReceivedProfilesList(_)))
        else {
            panic!("expected a profiles event");
        };
        let ids: Vec<&str> = profiles.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["u2", "u4"]);
    }

    #[tokio::test]
    async fn test_placement_flags() {
        let mut list = page(vec![Post::new("p1", "u2", "c1", "hi", 1)]);
        list.prev_post_id = Some("p0".to_string());
        let api = Arc::new(MockChatApi::new().with_posts(list));
        let store = Arc::new(RecordingStore::new("me").with_profile("u2", "bob").with_status("u2"));

        use_case(&api, &store).get_posts("c1", 2, 30).await.unwrap();

        let dispatched = store.dispatched();
        let leaves = dispatched[0].flatten();
        assert!(matches!(
            leaves[1],
            StoreAction::ReceivedPostsInChannel {
                recent: false,
                oldest: false,
                ..
            }
        ));
        assert_eq!(
            api.calls()[0],
            ApiCall::GetPosts {
                channel_id: ChannelId::new("c1"),
                page: 2,
                per_page: 30
            }
        );
    }

    #[tokio::test]
    async fn test_current_user_never_requested_or_returned() {
        let api = Arc::new(
            MockChatApi::new()
                .with_posts(page(vec![Post::new("p1", "me", "c1", "hi @myself", 1)]))
                .with_profiles(vec![UserProfile::new("me", "myself")]),
        );
        let store = Arc::new(RecordingStore::new("me").with_status("me"));

        use_case(&api, &store).get_posts("c1", 0, 60).await.unwrap();

        assert!(
            !api
                .calls()
                .iter()
                .any(|c| matches!(c, ApiCall::ProfilesByIds(_)))
        );
        let dispatched = store.dispatched();
        assert_eq!(
            kinds(&dispatched[0]),
            vec!["RECEIVED_POSTS", "RECEIVED_POSTS_IN_CHANNEL"]
        );
    }

    #[tokio::test]
    async fn test_enrichment_failure_is_swallowed() {
        let api = Arc::new(
            MockChatApi::new()
                .with_posts(page(vec![Post::new("p1", "u2", "c1", "hi", 1)]))
                .with_enrichment_error(ApiError::network("down")),
        );
        let store = Arc::new(RecordingStore::new("me"));

        let result = use_case(&api, &store).get_posts("c1", 0, 60).await;

        assert!(result.is_ok());
        let dispatched = store.dispatched();
        assert_eq!(dispatched.len(), 1);
        assert_eq!(
            kinds(&dispatched[0]),
            vec!["RECEIVED_POSTS", "RECEIVED_POSTS_IN_CHANNEL"]
        );
    }

    #[tokio::test]
    async fn test_primary_failure_surfaces() {
        let api = Arc::new(MockChatApi::new().with_posts_error(ApiError::status(403, "no access")));
        let store = Arc::new(RecordingStore::new("me"));

        let result = use_case(&api, &store).get_posts("c1", 0, 60).await;

        assert_eq!(result.unwrap_err(), ApiError::status(403, "no access"));
        assert!(store.dispatched().is_empty());
    }

    #[tokio::test]
    async fn test_posts_since_places_with_since_event() {
        let api = Arc::new(
            MockChatApi::new().with_posts(page(vec![Post::new("p9", "u2", "c1", "new", 9)])),
        );
        let store = Arc::new(RecordingStore::new("me").with_profile("u2", "bob").with_status("u2"));

        use_case(&api, &store)
            .get_posts_since("c1", 1_700_000_000_000)
            .await
            .unwrap();

        assert_eq!(
            api.calls()[0],
            ApiCall::GetPostsSince {
                channel_id: ChannelId::new("c1"),
                since: 1_700_000_000_000
            }
        );
        assert_eq!(
            kinds(&store.dispatched()[0]),
            vec!["RECEIVED_POSTS", "RECEIVED_POSTS_SINCE"]
        );
    }

    #[tokio::test]
    async fn test_custom_emoji_load_in_background() {
        let api = Arc::new(
            MockChatApi::new()
                .with_posts(page(vec![Post::new(
                    "p1",
                    "u2",
                    "c1",
                    ":parrot: :nope: :known:",
                    1,
                )]))
                .with_emojis(vec![CustomEmoji::new("e1", "parrot")]),
        );
        let store = Arc::new(
            RecordingStore::new("me")
                .with_profile("u2", "bob")
                .with_status("u2")
                .with_emoji("known"),
        );

        use_case(&api, &store).get_posts("c1", 0, 60).await.unwrap();
        wait_for_dispatches(&store, 2).await;

        assert!(api.calls().contains(&ApiCall::CustomEmojisByNames(vec![
            "parrot".to_string(),
            "nope".to_string()
        ])));

        let dispatched = store.dispatched();
        let emoji_batch = dispatched
            .iter()
            .find(|a| kinds(a).contains(&"RECEIVED_CUSTOM_EMOJIS"))
            .expect("emoji batch dispatched");
        assert!(emoji_batch.flatten().iter().any(|a| matches!(
            a,
            StoreAction::CustomEmojisNotFound(names) if names == &vec!["nope".to_string()]
        )));
    }

    #[tokio::test]
    async fn test_custom_emoji_disabled() {
        let api = Arc::new(
            MockChatApi::new().with_posts(page(vec![Post::new("p1", "u2", "c1", ":parrot:", 1)])),
        );
        let store = Arc::new(RecordingStore::new("me").with_profile("u2", "bob").with_status("u2"));

        use_case(&api, &store)
            .with_custom_emoji(false)
            .get_posts("c1", 0, 60)
            .await
            .unwrap();
        tokio::task::yield_now().await;

        assert!(
            !api
                .calls()
                .iter()
                .any(|c| matches!(c, ApiCall::CustomEmojisByNames(_)))
        );
    }

    #[test]
    fn test_needed_data_deduplicates_authors() {
        let api = Arc::new(MockChatApi::new());
        let store = Arc::new(RecordingStore::new("me"));
        let posts = [
            Post::new("p1", "u2", "c1", "a", 1),
            Post::new("p2", "u2", "c1", "b", 2),
            Post::new("p3", "me", "c1", "c", 3),
        ];
        let refs: Vec<&Post> = posts.iter().collect();

        let needed = use_case(&api, &store).needed_data(&refs);

        assert_eq!(needed.user_ids, vec![UserId::new("u2")]);
        assert_eq!(needed.statuses, vec![UserId::new("me"), UserId::new("u2")]);
        assert!(needed.usernames.is_empty());
    }
}
