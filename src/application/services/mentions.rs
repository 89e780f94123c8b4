//! @-mention extraction.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::Post;
use crate::domain::ports::StorePort;

/// Mentions that address a group rather than a user.
pub const SPECIAL_MENTIONS: [&str; 3] = ["all", "channel", "here"];

static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\B@(([a-z0-9_.-]*[a-z0-9_])[.-]*)").expect("mention pattern is valid")
});

/// Usernames mentioned in `posts` whose profiles are not loaded yet.
///
/// A mention with trailing punctuation yields both the raw and the trimmed
/// form, since either may be the real username.
#[must_use]
pub fn needed_at_mentioned_usernames(store: &dyn StorePort, posts: &[&Post]) -> BTreeSet<String> {
    let mut usernames = BTreeSet::new();

    for post in posts {
        if !post.message().contains('@') {
            continue;
        }

        for caps in MENTION_RE.captures_iter(post.message()) {
            let (Some(full), Some(trimmed)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let full = full.as_str().to_lowercase();
            let trimmed = trimmed.as_str().to_lowercase();

            if SPECIAL_MENTIONS.contains(&trimmed.as_str()) {
                continue;
            }

            if store.has_username(&full) || store.has_username(&trimmed) {
                continue;
            }

            usernames.insert(full);
            usernames.insert(trimmed);
        }
    }

    usernames
}
