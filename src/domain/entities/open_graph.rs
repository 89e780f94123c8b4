use serde::{Deserialize, Serialize};

use super::ImageDimensions;

/// Candidate image advertised by a page's Open Graph tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OpenGraphImage {
    /// Plain image URL.
    #[serde(default)]
    pub url: Option<String>,
    /// HTTPS variant of the image URL.
    #[serde(default)]
    pub secure_url: Option<String>,
    /// Declared width.
    #[serde(default)]
    pub width: Option<u32>,
    /// Declared height.
    #[serde(default)]
    pub height: Option<u32>,
}

impl OpenGraphImage {
    /// Creates an image candidate with a plain URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Sets the secure URL.
    #[must_use]
    pub fn with_secure_url(mut self, url: impl Into<String>) -> Self {
        self.secure_url = Some(url.into());
        self
    }

    /// Sets the declared dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Declared dimensions, when both are present and non-zero.
    #[must_use]
    pub fn dimensions(&self) -> Option<ImageDimensions> {
        ImageDimensions::from_parts(self.width, self.height)
    }

    /// Preferred URL: the secure one when offered.
    #[must_use]
    pub fn preferred_url(&self) -> Option<&str> {
        self.secure_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.url.as_deref().filter(|u| !u.is_empty()))
    }

    /// Returns true if either URL variant equals `url`.
    #[must_use]
    pub fn matches_url(&self, url: &str) -> bool {
        self.url.as_deref() == Some(url) || self.secure_url.as_deref() == Some(url)
    }
}

/// Scraped preview data for a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OpenGraphMetadata {
    /// Canonical URL of the page.
    #[serde(default)]
    pub url: Option<String>,
    /// Site name.
    #[serde(default)]
    pub site_name: Option<String>,
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Page description.
    #[serde(default)]
    pub description: Option<String>,
    /// Candidate preview images.
    #[serde(default)]
    pub images: Option<Vec<OpenGraphImage>>,
}

impl OpenGraphMetadata {
    /// Candidate images; empty when the page declares none.
    #[must_use]
    pub fn images(&self) -> &[OpenGraphImage] {
        self.images.as_deref().unwrap_or_default()
    }

    /// Returns true if the page declares an image list.
    #[must_use]
    pub const fn has_images(&self) -> bool {
        self.images.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_url_favours_secure() {
        let image = OpenGraphImage::new("http://example.com/a.png")
            .with_secure_url("https://example.com/a.png");
        assert_eq!(image.preferred_url(), Some("https://example.com/a.png"));

        let plain = OpenGraphImage::new("http://example.com/b.png");
        assert_eq!(plain.preferred_url(), Some("http://example.com/b.png"));
    }

    #[test]
    fn test_empty_secure_url_is_ignored() {
        let image = OpenGraphImage::new("http://example.com/a.png").with_secure_url("");
        assert_eq!(image.preferred_url(), Some("http://example.com/a.png"));
    }

    #[test]
    fn test_deserialize_server_payload() {
        let json = r#"{
            "type": "article",
            "url": "https://example.com/post",
            "site_name": "Example",
            "title": "A Post",
            "images": [{"url": "http://example.com/i.png", "secure_url": "https://example.com/i.png", "width": 800, "height": 400}]
        }"#;
        let og: OpenGraphMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(og.site_name.as_deref(), Some("Example"));
        assert_eq!(og.images().len(), 1);
        assert!(og.images()[0].matches_url("https://example.com/i.png"));
        assert_eq!(
            og.images()[0].dimensions(),
            Some(ImageDimensions::new(800, 400))
        );
    }
}
