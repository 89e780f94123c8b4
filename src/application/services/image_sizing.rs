//! Link preview image selection and sizing.

use crate::domain::entities::{ImageDimensions, OpenGraphImage};

/// Tallest box a preview image is chosen against.
pub const MAX_IMAGE_HEIGHT: u32 = 150;
/// Horizontal space taken by the post chrome around a preview.
pub const VIEWPORT_IMAGE_OFFSET: u32 = 93;
/// Extra indentation of posts shown as replies.
pub const VIEWPORT_IMAGE_REPLY_OFFSET: u32 = 13;
/// Width of the side panel on tablets.
pub const TABLET_WIDTH: u32 = 250;

/// Device screen the preview is laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Device width in pixels.
    pub width: u32,
    /// Device height in pixels.
    pub height: u32,
    /// Whether the side panel is permanently shown.
    pub is_tablet: bool,
}

impl Viewport {
    /// Creates a phone viewport.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            is_tablet: false,
        }
    }

    /// Marks the viewport as a tablet.
    #[must_use]
    pub const fn with_tablet(mut self, is_tablet: bool) -> Self {
        self.is_tablet = is_tablet;
        self
    }

    /// Width available to a preview image inside a post.
    ///
    /// Uses the shorter device side so rotation does not change the layout.
    #[must_use]
    pub fn post_width(&self, is_reply: bool) -> u32 {
        let device_size = self.width.min(self.height);
        let reply_offset = if is_reply { VIEWPORT_IMAGE_REPLY_OFFSET } else { 0 };
        let tablet_offset = if self.is_tablet { TABLET_WIDTH } else { 0 };

        device_size.saturating_sub(VIEWPORT_IMAGE_OFFSET + reply_offset + tablet_offset)
    }

    /// Box the best image is chosen against.
    #[must_use]
    pub fn target_box(&self, is_reply: bool) -> ImageDimensions {
        ImageDimensions::new(self.post_width(is_reply), MAX_IMAGE_HEIGHT)
    }
}

fn distance(a: ImageDimensions, b: ImageDimensions) -> f64 {
    let dx = f64::from(a.width) - f64::from(b.width);
    let dy = f64::from(a.height) - f64::from(b.height);
    dx.hypot(dy)
}

/// Candidate whose declared size is closest to `target`.
///
/// Candidates without dimensions only win when none declares any.
#[must_use]
pub fn nearest_image(target: ImageDimensions, images: &[OpenGraphImage]) -> Option<&OpenGraphImage> {
    let mut best: Option<(&OpenGraphImage, f64)> = None;

    for image in images {
        let Some(dimensions) = image.dimensions() else {
            continue;
        };
        let d = distance(dimensions, target);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((image, d));
        }
    }

    best.map(|(image, _)| image).or_else(|| images.first())
}

/// Scales `original` down to `max_width`, keeping its aspect ratio.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn calculate_dimensions(original: ImageDimensions, max_width: u32) -> ImageDimensions {
    if original.width <= max_width {
        return original;
    }

    let ratio = f64::from(original.height) / f64::from(original.width);
    let height = (f64::from(max_width) * ratio).round() as u32;

    ImageDimensions::new(max_width, height)
}

/// File name shown by the image viewer for a preview image.
#[must_use]
pub fn preview_filename(link: &str) -> String {
    let start = link.rfind('/').map_or(0, |i| i + 1);
    let end = link
        .find('?')
        .filter(|&q| q >= start)
        .unwrap_or(link.len());

    let mut filename = link[start..end].to_string();
    if !filename.contains('.') {
        filename.push_str(".png");
    }

    format!("og-{}", filename.replace(':', "-"))
}
