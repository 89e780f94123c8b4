use serde::{Deserialize, Serialize};

use super::UserId;

/// Presence of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum PresenceStatus {
    Online,
    Away,
    Dnd,
    #[default]
    Offline,
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Away => write!(f, "away"),
            Self::Dnd => write!(f, "dnd"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Presence record for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    /// The user the status belongs to.
    pub user_id: UserId,
    /// Current presence.
    pub status: PresenceStatus,
    /// Whether the user set the status by hand.
    #[serde(default)]
    pub manual: bool,
    /// Last activity, epoch milliseconds.
    #[serde(default)]
    pub last_activity_at: i64,
}

impl UserStatus {
    /// Creates a status record.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, status: PresenceStatus) -> Self {
        Self {
            user_id: user_id.into(),
            status,
            manual: false,
            last_activity_at: 0,
        }
    }
}
