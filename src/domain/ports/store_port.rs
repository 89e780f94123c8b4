//! Port for the client-side chat state store.

use crate::domain::entities::UserId;
use crate::domain::events::StoreAction;

/// Port for dispatching update events and reading what is already known.
pub trait StorePort: Send + Sync {
    /// Applies an update event. A batch is applied as one transition.
    fn dispatch(&self, action: StoreAction);

    /// Id of the signed-in user, if known.
    fn current_user_id(&self) -> Option<UserId>;

    /// Returns true if a profile for `user_id` is loaded.
    fn has_profile(&self, user_id: &UserId) -> bool;

    /// Returns true if a profile with `username` is loaded.
    fn has_username(&self, username: &str) -> bool;

    /// Returns true if a presence status for `user_id` is loaded.
    fn has_status(&self, user_id: &UserId) -> bool;

    /// Returns true if `name` is a loaded custom emoji or known not to exist.
    fn knows_emoji(&self, name: &str) -> bool;
}
