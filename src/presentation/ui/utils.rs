//! Formatting helpers for the post listing.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::application::services::UrlExtractor;
use crate::domain::entities::{Post, UserProfile, UserStatus};

/// Formats epoch milliseconds as local "YYYY-MM-DD HH:MM".
/// Out-of-range values are shown raw.
#[must_use]
pub fn format_post_time(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => {
            let local: DateTime<Local> = dt.into();
            local.format("%Y-%m-%d %H:%M").to_string()
        }
        None => millis.to_string(),
    }
}

/// One line of the post listing: time, author, presence and message.
///
/// Unknown authors are shown by id. Multi-line messages are folded onto
/// one line.
#[must_use]
pub fn post_line(post: &Post, author: Option<&UserProfile>, status: Option<&UserStatus>) -> String {
    let name = author.map_or_else(|| post.user_id().to_string(), UserProfile::display_name);
    let presence = status.map(|s| format!(" ({})", s.status)).unwrap_or_default();
    let message = post.message().split_whitespace().collect::<Vec<_>>().join(" ");

    format!(
        "{} {name}{presence}: {message}",
        format_post_time(post.create_at())
    )
}

/// Link of the post that `preview` can show, if any.
#[must_use]
pub fn post_link(post: &Post) -> Option<String> {
    UrlExtractor::first_link(post.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PresenceStatus;

    #[test]
    fn test_format_post_time_out_of_range() {
        assert_eq!(format_post_time(i64::MAX), i64::MAX.to_string());
        assert_eq!(format_post_time(0).len(), "1970-01-01 00:00".len());
    }

    #[test]
    fn test_post_line_with_profile() {
        let post = Post::new("p1", "u1", "c1", "hello\n  world", 0);
        let author = UserProfile::new("u1", "alice").with_nickname("Ali");
        let status = UserStatus::new("u1", PresenceStatus::Away);

        let line = post_line(&post, Some(&author), Some(&status));
        assert!(line.ends_with(" Ali (away): hello world"));
    }

    #[test]
    fn test_post_line_unknown_author() {
        let post = Post::new("p1", "u1", "c1", "hi", 0);
        assert!(post_line(&post, None, None).ends_with(" u1: hi"));
    }

    #[test]
    fn test_post_link() {
        let post = Post::new("p1", "u1", "c1", "see [docs](https://example.com/docs).", 0);
        assert_eq!(post_link(&post).as_deref(), Some("https://example.com/docs"));
    }
}
