//! Ephemeral notices and interactive message actions.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::{ChannelId, Post, PostId, PostKind, UserProfile};
use crate::domain::errors::ApiError;
use crate::domain::events::{
    ActionMenuSelector, MenuDataSource, MenuOption, SelectCallback, StoreAction,
};
use crate::domain::ports::{ChatApiPort, PostActionResponse, StorePort};

/// Actions a user takes on posts.
pub struct PostActionsUseCase {
    api: Arc<dyn ChatApiPort>,
    store: Arc<dyn StorePort>,
}

impl PostActionsUseCase {
    /// Creates new post actions use case.
    #[must_use]
    pub fn new(api: Arc<dyn ChatApiPort>, store: Arc<dyn StorePort>) -> Self {
        Self { api, store }
    }

    /// Inserts a local-only notice offering to add a mentioned user to the
    /// channel.
    ///
    /// The post gets a fresh id and the current time, and is dispatched as a
    /// new post. It is never sent to the server.
    pub fn send_add_to_channel_ephemeral_post(
        &self,
        user: &UserProfile,
        added_username: &str,
        message: &str,
        channel_id: &ChannelId,
        post_root_id: Option<&PostId>,
    ) -> Post {
        let post = Post::new(
            PostId::new(Uuid::new_v4().simple().to_string()),
            user.id().clone(),
            channel_id.clone(),
            message,
            Utc::now().timestamp_millis(),
        )
        .with_kind(PostKind::EphemeralAddToChannel)
        .with_root(post_root_id.cloned())
        .with_prop("username", user.username())
        .with_prop("addedUsername", added_username);

        debug!(post_id = %post.id(), channel_id = %channel_id, "Adding ephemeral post");
        self.store.dispatch(StoreAction::ReceivedNewPost(post.clone()));
        post
    }

    /// Builds the event that opens the autocomplete selector.
    #[must_use]
    pub fn set_autocomplete_selector(
        data_source: Option<&str>,
        on_select: Option<SelectCallback>,
        options: Vec<MenuOption>,
    ) -> StoreAction {
        StoreAction::SelectedActionMenu(ActionMenuSelector {
            data_source: MenuDataSource::from(data_source),
            options,
            on_select,
        })
    }

    /// Submits the option picked in an attachment menu.
    ///
    /// The selection is recorded before the action runs. A returned trigger
    /// id is dispatched so the dialog can be opened.
    ///
    /// # Errors
    /// Returns error if the action request fails.
    pub async fn select_attachment_menu_action(
        &self,
        post_id: &PostId,
        action_id: &str,
        text: &str,
        value: &str,
    ) -> Result<PostActionResponse, ApiError> {
        self.store.dispatch(StoreAction::SubmitAttachmentMenuAction {
            post_id: post_id.clone(),
            action_id: action_id.to_string(),
            text: text.to_string(),
            value: value.to_string(),
        });

        let response = self.api.do_post_action(post_id, action_id, value).await?;

        if let Some(trigger_id) = response.trigger_id.as_ref().filter(|t| !t.is_empty()) {
            info!(post_id = %post_id, "Post action opened a dialog");
            self.store.dispatch(StoreAction::ReceivedPostActionTrigger {
                post_id: post_id.clone(),
                trigger_id: trigger_id.clone(),
            });
        }

        Ok(response)
    }
}
