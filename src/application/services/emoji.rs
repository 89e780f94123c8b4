//! Custom emoji name extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::Post;

static EMOJI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z0-9_+-]+):").expect("emoji pattern is valid"));

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `:name:` tokens that start the text or follow a non-word character.
///
/// Adjacent tokens such as `:a::b:` are both reported.
fn emoji_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(caps) = EMOJI_RE.captures_at(text, pos) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        let at_boundary = !text[..whole.start()].chars().next_back().is_some_and(is_word_char);
        if at_boundary {
            tokens.push(name.as_str());
            pos = whole.end();
        } else {
            // The opening colon may still close a token further on.
            pos = whole.start() + 1;
        }
    }

    tokens
}

/// Emoji names written as `:name:` in the posts, first-seen order, lower-cased.
#[must_use]
pub fn emoji_names_in_posts(posts: &[&Post]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for post in posts {
        if !post.message().contains(':') {
            continue;
        }

        for name in emoji_tokens(post.message()) {
            let name = name.to_lowercase();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    names
}
