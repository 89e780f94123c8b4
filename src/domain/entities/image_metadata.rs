//! Image dimension metadata keyed by image URL.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Width and height of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates a dimension pair.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Builds dimensions from optional parts; zero counts as missing.
    #[must_use]
    pub fn from_parts(width: Option<u32>, height: Option<u32>) -> Option<Self> {
        match (width, height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(Self::new(w, h)),
            _ => None,
        }
    }
}

/// Metadata recorded for a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ImageMetadata {
    /// Width in pixels, if known.
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels, if known.
    #[serde(default)]
    pub height: Option<u32>,
    /// Image format, e.g. `png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Number of frames for animated images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<u32>,
}

impl ImageMetadata {
    /// Creates metadata carrying only dimensions.
    #[must_use]
    pub const fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            format: None,
            frame_count: None,
        }
    }

    /// Returns the dimensions when both sides are known and non-zero.
    #[must_use]
    pub fn dimensions(&self) -> Option<ImageDimensions> {
        ImageDimensions::from_parts(self.width, self.height)
    }
}

/// Insertion ordered map from image URL to its metadata.
///
/// Entries are write-once: recording a URL that is already present
/// leaves the existing entry untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageMetadataCache {
    order: Vec<String>,
    entries: HashMap<String, ImageMetadata>,
}

impl ImageMetadataCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records metadata for `url`. Returns false if the URL was already known.
    pub fn record(&mut self, url: impl Into<String>, metadata: ImageMetadata) -> bool {
        let url = url.into();
        if self.entries.contains_key(&url) {
            return false;
        }
        self.order.push(url.clone());
        self.entries.insert(url, metadata);
        true
    }

    /// Returns the metadata recorded for `url`.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&ImageMetadata> {
        self.entries.get(url)
    }

    /// Returns true if `url` has been recorded.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Recorded URLs in insertion order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImageMetadata)> {
        self.order
            .iter()
            .filter_map(|url| self.entries.get(url).map(|m| (url.as_str(), m)))
    }

    /// First recorded entry that carries usable dimensions.
    #[must_use]
    pub fn first_with_dimensions(&self) -> Option<ImageDimensions> {
        self.iter().find_map(|(_, m)| m.dimensions())
    }

    /// Number of recorded images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Serialize for ImageMetadataCache {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (url, metadata) in self.iter() {
            map.serialize_entry(url, metadata)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ImageMetadataCache {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CacheVisitor;

        impl<'de> Visitor<'de> for CacheVisitor {
            type Value = ImageMetadataCache;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of image URLs to image metadata")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ImageMetadataCache::new())
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut cache = ImageMetadataCache::new();
                while let Some((url, metadata)) = access.next_entry::<String, ImageMetadata>()? {
                    cache.record(url, metadata);
                }
                Ok(cache)
            }
        }

        deserializer.deserialize_any(CacheVisitor)
    }
}
