//! Link extraction from post text.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_markdown_links() {
        let content = "Read [the docs](https://example.com/docs) first";
        let urls = UrlExtractor::extract_links(content);
        assert_eq!(urls, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_extract_bare_links() {
        let content = "Check this out https://example.com/post?id=1, cool right?";
        let urls = UrlExtractor::extract_links(content);
        assert_eq!(urls, vec!["https://example.com/post?id=1"]);
    }

    #[test]
    fn test_markdown_link_not_reported_twice() {
        let content = "[x](https://a.com/1) and https://b.com/2 and https://a.com/1";
        let urls = UrlExtractor::extract_links(content);
        assert_eq!(urls, vec!["https://a.com/1", "https://b.com/2"]);
    }

    #[test]
    fn test_first_link() {
        assert_eq!(
            UrlExtractor::first_link("see http://a.com and http://b.com"),
            Some("http://a.com".to_string())
        );
        assert_eq!(UrlExtractor::first_link("Just some text."), None);
    }
}

use regex::Regex;
use std::sync::LazyLock;

/// Finds links worth previewing in post text.
pub struct UrlExtractor;

impl UrlExtractor {
    /// Links in order of appearance, de-duplicated.
    #[must_use]
    pub fn extract_links(content: &str) -> Vec<String> {
        static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\]\((https?://[^)\s]+)\)|(https?://[^\s<>()\[\]]+)")
                .expect("link pattern is valid")
        });

        if !content.contains("http") {
            return Vec::new();
        }

        let mut urls: Vec<String> = Vec::new();

        for cap in LINK_RE.captures_iter(content) {
            if let Some(url) = cap.get(1).or_else(|| cap.get(2)) {
                let url_str = url
                    .as_str()
                    .trim_end_matches(['.', ',', '!', '?', ';', ':'])
                    .to_owned();
                if !urls.contains(&url_str) {
                    urls.push(url_str);
                }
            }
        }

        urls
    }

    /// First link in the text.
    #[must_use]
    pub fn first_link(content: &str) -> Option<String> {
        Self::extract_links(content).into_iter().next()
    }
}
