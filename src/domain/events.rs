//! Typed update events applied to the chat state.

use std::sync::Arc;

use super::entities::{
    ChannelId, CustomEmoji, OpenGraphMetadata, Post, PostId, PostList, UserProfile, UserStatus,
};

/// Source the autocomplete selector draws its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuDataSource {
    /// Options are the ones supplied with the menu.
    #[default]
    Static,
    /// Options are users of the team.
    Users,
    /// Options are channels of the team.
    Channels,
}

impl From<Option<&str>> for MenuDataSource {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some("users") => Self::Users,
            Some("channels") => Self::Channels,
            _ => Self::Static,
        }
    }
}

/// One option of an interactive message menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    /// Label shown to the user.
    pub text: String,
    /// Value sent back to the integration.
    pub value: String,
}

impl MenuOption {
    /// Creates a menu option.
    #[must_use]
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// Callback invoked when the user picks an option.
pub type SelectCallback = Arc<dyn Fn(&MenuOption) + Send + Sync>;

/// State of the full-screen autocomplete selector.
#[derive(Clone)]
pub struct ActionMenuSelector {
    /// Where options come from.
    pub data_source: MenuDataSource,
    /// Static options.
    pub options: Vec<MenuOption>,
    /// Selection handler.
    pub on_select: Option<SelectCallback>,
}

impl std::fmt::Debug for ActionMenuSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionMenuSelector")
            .field("data_source", &self.data_source)
            .field("options", &self.options)
            .field("has_on_select", &self.on_select.is_some())
            .finish()
    }
}

/// Update events accepted by the store.
#[derive(Debug, Clone)]
pub enum StoreAction {
    /// Raw posts of a fetched page.
    ReceivedPosts(PostList),
    /// Page placement for a channel timeline.
    ReceivedPostsInChannel {
        /// Channel the page belongs to.
        channel_id: ChannelId,
        /// Post ids, newest first.
        order: Vec<PostId>,
        /// The page is the most recent one.
        recent: bool,
        /// Nothing older exists.
        oldest: bool,
    },
    /// Posts created or edited since a timestamp.
    ReceivedPostsSince {
        /// Channel the posts belong to.
        channel_id: ChannelId,
        /// Post ids, newest first.
        order: Vec<PostId>,
    },
    /// A single new post, e.g. an ephemeral notice.
    ReceivedNewPost(Post),
    /// User profiles.
    ReceivedProfilesList(Vec<UserProfile>),
    /// Presence statuses.
    ReceivedStatuses(Vec<UserStatus>),
    /// Custom emoji definitions.
    ReceivedCustomEmojis(Vec<CustomEmoji>),
    /// Emoji names the server does not know.
    CustomEmojisNotFound(Vec<String>),
    /// Open Graph metadata for a link.
    ReceivedOpenGraphMetadata {
        /// Link the metadata was scraped from.
        url: String,
        /// Scraped metadata.
        data: OpenGraphMetadata,
    },
    /// Opens the autocomplete selector.
    SelectedActionMenu(ActionMenuSelector),
    /// Records the option picked in an attachment menu.
    SubmitAttachmentMenuAction {
        /// Post carrying the menu.
        post_id: PostId,
        /// Menu action id.
        action_id: String,
        /// Picked label.
        text: String,
        /// Picked value.
        value: String,
    },
    /// Interactive dialog trigger returned by a post action.
    ReceivedPostActionTrigger {
        /// Post the action belongs to.
        post_id: PostId,
        /// Trigger id for opening the dialog.
        trigger_id: String,
    },
    /// Several events applied as one transition.
    Batch(Vec<StoreAction>),
}

impl StoreAction {
    /// Wraps `actions` so they are applied atomically.
    #[must_use]
    pub const fn batch(actions: Vec<Self>) -> Self {
        Self::Batch(actions)
    }

    /// Leaf events in application order.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Self> {
        match self {
            Self::Batch(actions) => actions.iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }

    /// Event name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ReceivedPosts(_) => "RECEIVED_POSTS",
            Self::ReceivedPostsInChannel { .. } => "RECEIVED_POSTS_IN_CHANNEL",
            Self::ReceivedPostsSince { .. } => "RECEIVED_POSTS_SINCE",
            Self::ReceivedNewPost(_) => "RECEIVED_NEW_POST",
            Self::ReceivedProfilesList(_) => "RECEIVED_PROFILES_LIST",
            Self::ReceivedStatuses(_) => "RECEIVED_STATUSES",
            Self::ReceivedCustomEmojis(_) => "RECEIVED_CUSTOM_EMOJIS",
            Self::CustomEmojisNotFound(_) => "CUSTOM_EMOJIS_NOT_FOUND",
            Self::ReceivedOpenGraphMetadata { .. } => "RECEIVED_OPEN_GRAPH_METADATA",
            Self::SelectedActionMenu(_) => "SELECTED_ACTION_MENU",
            Self::SubmitAttachmentMenuAction { .. } => "SUBMIT_ATTACHMENT_MENU_ACTION",
            Self::ReceivedPostActionTrigger { .. } => "RECEIVED_DIALOG_TRIGGER_ID",
            Self::Batch(_) => "BATCH",
        }
    }
}
