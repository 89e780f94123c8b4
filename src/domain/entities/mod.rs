//! Domain entity definitions.

mod emoji;
mod ids;
mod image_metadata;
mod open_graph;
mod post;
mod status;
mod user;

pub use emoji::CustomEmoji;
pub use ids::{ChannelId, PostId, UserId};
pub use image_metadata::{ImageDimensions, ImageMetadata, ImageMetadataCache};
pub use open_graph::{OpenGraphImage, OpenGraphMetadata};
pub use post::{Post, PostEmbed, PostKind, PostList, PostMetadata};
pub use status::{PresenceStatus, UserStatus};
pub use user::UserProfile;
