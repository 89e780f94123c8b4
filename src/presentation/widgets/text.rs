//! Width-aware text fitting.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Cuts `text` to `width` columns, ending with an ellipsis when shortened.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}

/// Word-wraps `text` to `width` columns, keeping at most `max_lines`.
///
/// When text is left over the last kept line ends with an ellipsis. Words
/// wider than a line are broken.
#[must_use]
pub fn wrap_text(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };

        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        for ch in word.chars() {
            let w = ch.width().unwrap_or(0);
            if current_width + w > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let shortened = truncate_with_ellipsis(last, width.saturating_sub(1));
            *last = if shortened.ends_with(ELLIPSIS) {
                shortened
            } else {
                format!("{shortened}{ELLIPSIS}")
            };
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello…");
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate_with_ellipsis("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10, 5),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_limits_lines() {
        let lines = wrap_text("one two three four five six", 9, 2);
        assert_eq!(lines, vec!["one two", "three…"]);
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        assert_eq!(
            wrap_text("abcdefghij", 4, 5),
            vec!["abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap_text("   ", 10, 3).is_empty());
        assert!(wrap_text("text", 0, 3).is_empty());
    }
}
