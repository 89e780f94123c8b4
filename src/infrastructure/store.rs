//! In-memory chat state store.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::domain::entities::{
    ChannelId, CustomEmoji, OpenGraphMetadata, Post, PostId, UserId, UserProfile, UserStatus,
};
use crate::domain::events::{ActionMenuSelector, MenuOption, StoreAction};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ChatApiPort, StorePort};

#[derive(Debug, Default)]
struct ChatState {
    current_user_id: Option<UserId>,
    posts: HashMap<PostId, Post>,
    posts_in_channel: HashMap<ChannelId, Vec<PostId>>,
    oldest_loaded: HashSet<ChannelId>,
    profiles: HashMap<UserId, UserProfile>,
    usernames: HashMap<String, UserId>,
    statuses: HashMap<UserId, UserStatus>,
    custom_emojis: HashMap<String, CustomEmoji>,
    nonexistent_emojis: HashSet<String>,
    open_graph: HashMap<String, OpenGraphMetadata>,
    action_menu: Option<ActionMenuSelector>,
    submitted_menu_values: HashMap<(PostId, String), MenuOption>,
    dialog_trigger: Option<(PostId, String)>,
}

impl ChatState {
    fn apply(&mut self, action: StoreAction) {
        match action {
            StoreAction::ReceivedPosts(list) => {
                self.posts.extend(list.posts);
            }
            StoreAction::ReceivedPostsInChannel {
                channel_id,
                order,
                recent,
                oldest,
            } => {
                if oldest {
                    self.oldest_loaded.insert(channel_id.clone());
                }
                self.place_posts(channel_id, order, recent);
            }
            StoreAction::ReceivedPostsSince { channel_id, order } => {
                self.place_posts(channel_id, order, true);
            }
            StoreAction::ReceivedNewPost(post) => {
                let channel_id = post.channel_id().clone();
                let id = post.id().clone();
                self.posts.insert(id.clone(), post);
                self.place_posts(channel_id, vec![id], true);
            }
            StoreAction::ReceivedProfilesList(profiles) => {
                for profile in profiles {
                    self.usernames
                        .insert(profile.username().to_lowercase(), profile.id().clone());
                    self.profiles.insert(profile.id().clone(), profile);
                }
            }
            StoreAction::ReceivedStatuses(statuses) => {
                for status in statuses {
                    self.statuses.insert(status.user_id.clone(), status);
                }
            }
            StoreAction::ReceivedCustomEmojis(emojis) => {
                for emoji in emojis {
                    self.nonexistent_emojis.remove(&emoji.name);
                    self.custom_emojis.insert(emoji.name.clone(), emoji);
                }
            }
            StoreAction::CustomEmojisNotFound(names) => {
                self.nonexistent_emojis.extend(names);
            }
            StoreAction::ReceivedOpenGraphMetadata { url, data } => {
                self.open_graph.insert(url, data);
            }
            StoreAction::SelectedActionMenu(selector) => {
                self.action_menu = Some(selector);
            }
            StoreAction::SubmitAttachmentMenuAction {
                post_id,
                action_id,
                text,
                value,
            } => {
                self.submitted_menu_values
                    .insert((post_id, action_id), MenuOption::new(text, value));
            }
            StoreAction::ReceivedPostActionTrigger {
                post_id,
                trigger_id,
            } => {
                self.dialog_trigger = Some((post_id, trigger_id));
            }
            StoreAction::Batch(actions) => {
                for action in actions {
                    self.apply(action);
                }
            }
        }
    }

    /// Merges `order` into the channel timeline, keeping it newest first
    /// without duplicates.
    fn place_posts(&mut self, channel_id: ChannelId, order: Vec<PostId>, newer: bool) {
        let existing = self.posts_in_channel.remove(&channel_id).unwrap_or_default();

        let (first, second) = if newer {
            (order, existing)
        } else {
            (existing, order)
        };

        let mut seen = HashSet::new();
        let mut merged: Vec<PostId> = first
            .into_iter()
            .chain(second)
            .filter(|id| seen.insert(id.clone()))
            .collect();

        merged.sort_by_key(|id| Reverse(self.posts.get(id).map_or(0, Post::create_at)));
        self.posts_in_channel.insert(channel_id, merged);
    }
}

/// Thread-safe chat state.
///
/// Every dispatch, batches included, is applied under one write lock and
/// bumps the revision once.
#[derive(Debug, Clone)]
pub struct ChatStore {
    state: Arc<RwLock<ChatState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ChatStore {
    /// Creates an empty store for the signed-in user.
    #[must_use]
    pub fn new(current_user_id: Option<UserId>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(ChatState {
                current_user_id,
                ..ChatState::default()
            })),
            revision: Arc::new(revision),
        }
    }

    /// Creates a store for the user the API is signed in as.
    ///
    /// The user's own profile is stored up front, so posts by the user
    /// never need a profile lookup.
    ///
    /// # Errors
    /// Returns error if the signed-in user cannot be fetched.
    pub async fn signed_in(api: &dyn ChatApiPort) -> Result<Self, ApiError> {
        let me = api.get_me().await?;
        debug!(user_id = %me.id(), "Signed in");

        let store = Self::new(Some(me.id().clone()));
        store.dispatch(StoreAction::ReceivedProfilesList(vec![me]));
        Ok(store)
    }

    /// Number of applied dispatches.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Subscribes to revision changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Posts of a channel, newest first.
    #[must_use]
    pub fn posts_in_channel(&self, channel_id: &ChannelId) -> Vec<Post> {
        let state = self.state.read();
        state
            .posts_in_channel
            .get(channel_id)
            .map(|order| {
                order
                    .iter()
                    .filter_map(|id| state.posts.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns true once the oldest post of the channel has been loaded.
    #[must_use]
    pub fn reached_oldest(&self, channel_id: &ChannelId) -> bool {
        self.state.read().oldest_loaded.contains(channel_id)
    }

    /// Loaded post.
    #[must_use]
    pub fn post(&self, post_id: &PostId) -> Option<Post> {
        self.state.read().posts.get(post_id).cloned()
    }

    /// Loaded profile.
    #[must_use]
    pub fn profile(&self, user_id: &UserId) -> Option<UserProfile> {
        self.state.read().profiles.get(user_id).cloned()
    }

    /// Loaded presence status.
    #[must_use]
    pub fn status(&self, user_id: &UserId) -> Option<UserStatus> {
        self.state.read().statuses.get(user_id).cloned()
    }

    /// Loaded custom emoji.
    #[must_use]
    pub fn custom_emoji(&self, name: &str) -> Option<CustomEmoji> {
        self.state.read().custom_emojis.get(name).cloned()
    }

    /// Stored Open Graph metadata for a link.
    #[must_use]
    pub fn open_graph(&self, url: &str) -> Option<OpenGraphMetadata> {
        self.state.read().open_graph.get(url).cloned()
    }

    /// Currently open autocomplete selector.
    #[must_use]
    pub fn action_menu(&self) -> Option<ActionMenuSelector> {
        self.state.read().action_menu.clone()
    }

    /// Option last submitted for a post's menu action.
    #[must_use]
    pub fn submitted_menu_value(&self, post_id: &PostId, action_id: &str) -> Option<MenuOption> {
        self.state
            .read()
            .submitted_menu_values
            .get(&(post_id.clone(), action_id.to_string()))
            .cloned()
    }

    /// Last interactive dialog trigger.
    #[must_use]
    pub fn dialog_trigger(&self) -> Option<(PostId, String)> {
        self.state.read().dialog_trigger.clone()
    }
}

impl StorePort for ChatStore {
    fn dispatch(&self, action: StoreAction) {
        let kind = action.kind();
        self.state.write().apply(action);
        self.revision.send_modify(|revision| *revision += 1);
        trace!(kind, revision = self.revision(), "Store updated");
    }

    fn current_user_id(&self) -> Option<UserId> {
        self.state.read().current_user_id.clone()
    }

    fn has_profile(&self, user_id: &UserId) -> bool {
        self.state.read().profiles.contains_key(user_id)
    }

    fn has_username(&self, username: &str) -> bool {
        self.state
            .read()
            .usernames
            .contains_key(&username.to_lowercase())
    }

    fn has_status(&self, user_id: &UserId) -> bool {
        self.state.read().statuses.contains_key(user_id)
    }

    fn knows_emoji(&self, name: &str) -> bool {
        let state = self.state.read();
        state.custom_emojis.contains_key(name) || state.nonexistent_emojis.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PostList, PresenceStatus};

    fn post(id: &str, create_at: i64) -> Post {
        Post::new(id, "u1", "c1", "text", create_at)
    }

    fn receive_page(store: &ChatStore, posts: Vec<Post>, recent: bool) {
        let list = PostList::from_posts(posts);
        let order = list.order.clone();
        store.dispatch(StoreAction::batch(vec![
            StoreAction::ReceivedPosts(list),
            StoreAction::ReceivedPostsInChannel {
                channel_id: ChannelId::new("c1"),
                order,
                recent,
                oldest: false,
            },
        ]));
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id().as_str()).collect()
    }

    #[test]
    fn test_batch_bumps_revision_once() {
        let store = ChatStore::new(Some(UserId::new("me")));
        let mut rx = store.subscribe();

        receive_page(&store, vec![post("p2", 2), post("p1", 1)], true);

        assert_eq!(store.revision(), 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    #[test]
    fn test_subscriber_woken_by_dispatch() {
        let store = ChatStore::default();
        let mut rx = store.subscribe();

        store.dispatch(StoreAction::ReceivedNewPost(post("p1", 1)));

        tokio_test::block_on(rx.changed()).unwrap();
        assert_eq!(*rx.borrow(), 1);
    }

    #[test]
    fn test_pages_merge_newest_first() {
        let store = ChatStore::default();
        let channel = ChannelId::new("c1");

        receive_page(&store, vec![post("p4", 4), post("p3", 3)], true);
        receive_page(&store, vec![post("p3", 3), post("p2", 2)], false);
        store.dispatch(StoreAction::batch(vec![
            StoreAction::ReceivedPosts(PostList::from_posts(vec![post("p5", 5)])),
            StoreAction::ReceivedPostsSince {
                channel_id: channel.clone(),
                order: vec![PostId::new("p5")],
            },
        ]));

        assert_eq!(
            ids(&store.posts_in_channel(&channel)),
            vec!["p5", "p4", "p3", "p2"]
        );
        assert!(!store.reached_oldest(&channel));
    }

    #[test]
    fn test_oldest_flag_recorded() {
        let store = ChatStore::default();
        store.dispatch(StoreAction::ReceivedPostsInChannel {
            channel_id: ChannelId::new("c1"),
            order: Vec::new(),
            recent: false,
            oldest: true,
        });

        assert!(store.reached_oldest(&ChannelId::new("c1")));
    }

    #[test]
    fn test_new_post_joins_timeline() {
        let store = ChatStore::default();
        receive_page(&store, vec![post("p1", 1)], true);

        store.dispatch(StoreAction::ReceivedNewPost(post("eph", 10)));

        assert_eq!(
            ids(&store.posts_in_channel(&ChannelId::new("c1"))),
            vec!["eph", "p1"]
        );
    }

    #[test]
    fn test_profiles_and_statuses() {
        let store = ChatStore::default();
        store.dispatch(StoreAction::batch(vec![
            StoreAction::ReceivedProfilesList(vec![UserProfile::new("u2", "Bob")]),
            StoreAction::ReceivedStatuses(vec![UserStatus::new("u2", PresenceStatus::Dnd)]),
        ]));

        assert!(store.has_profile(&UserId::new("u2")));
        assert!(store.has_username("bob"));
        assert!(store.has_status(&UserId::new("u2")));
        assert_eq!(
            store.status(&UserId::new("u2")).map(|s| s.status),
            Some(PresenceStatus::Dnd)
        );
    }

    #[test]
    fn test_emoji_known_after_lookup() {
        let store = ChatStore::default();
        store.dispatch(StoreAction::batch(vec![
            StoreAction::ReceivedCustomEmojis(vec![CustomEmoji::new("e1", "parrot")]),
            StoreAction::CustomEmojisNotFound(vec!["nope".to_string()]),
        ]));

        assert!(store.knows_emoji("parrot"));
        assert!(store.knows_emoji("nope"));
        assert!(!store.knows_emoji("other"));
        assert!(store.custom_emoji("parrot").is_some());
    }

    #[test]
    fn test_menu_submission_and_trigger() {
        let store = ChatStore::default();
        store.dispatch(StoreAction::SubmitAttachmentMenuAction {
            post_id: PostId::new("p1"),
            action_id: "a1".to_string(),
            text: "One".to_string(),
            value: "1".to_string(),
        });
        store.dispatch(StoreAction::ReceivedPostActionTrigger {
            post_id: PostId::new("p1"),
            trigger_id: "t1".to_string(),
        });

        assert_eq!(
            store.submitted_menu_value(&PostId::new("p1"), "a1"),
            Some(MenuOption::new("One", "1"))
        );
        assert_eq!(
            store.dialog_trigger(),
            Some((PostId::new("p1"), "t1".to_string()))
        );
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_open_graph_stored() {
        let store = ChatStore::default();
        store.dispatch(StoreAction::ReceivedOpenGraphMetadata {
            url: "https://example.com".to_string(),
            data: OpenGraphMetadata::default(),
        });

        assert!(store.open_graph("https://example.com").is_some());
    }

    #[tokio::test]
    async fn test_signed_in_store_excludes_current_user_from_lookups() {
        use crate::application::use_cases::FetchPostsUseCase;
        use crate::domain::ports::mocks::{ApiCall, MockChatApi};

        let list = PostList::from_posts(vec![
            Post::new("p2", "me", "c1", "mine", 2),
            Post::new("p1", "u2", "c1", "theirs", 1),
        ]);
        let api = Arc::new(
            MockChatApi::new()
                .with_me(UserProfile::new("me", "alice"))
                .with_posts(list),
        );

        let store = ChatStore::signed_in(api.as_ref()).await.unwrap();
        assert_eq!(store.current_user_id(), Some(UserId::new("me")));
        assert_eq!(store.profile(&UserId::new("me")).unwrap().username(), "alice");

        FetchPostsUseCase::new(api.clone(), Arc::new(store.clone()))
            .with_custom_emoji(false)
            .get_posts("c1", 0, 60)
            .await
            .unwrap();

        let calls = api.calls();
        assert_eq!(calls[0], ApiCall::GetMe);
        assert!(calls.contains(&ApiCall::ProfilesByIds(vec![UserId::new("u2")])));
        assert!(
            !calls
                .iter()
                .any(|c| matches!(c, ApiCall::ProfilesByIds(ids) if ids.contains(&UserId::new("me"))))
        );
    }

    #[tokio::test]
    async fn test_signed_in_requires_session() {
        use crate::domain::ports::mocks::MockChatApi;

        let err = ChatStore::signed_in(&MockChatApi::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
    }
}
