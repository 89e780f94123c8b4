use serde::{Deserialize, Serialize};

use super::UserId;

/// Server-side custom emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct CustomEmoji {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub creator_id: UserId,
}

impl CustomEmoji {
    /// Creates a custom emoji record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            creator_id: UserId::default(),
        }
    }
}
