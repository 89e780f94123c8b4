//! Application services.

pub mod emoji;
pub mod image_sizing;
pub mod link_preview;
pub mod mentions;
pub mod url_extractor;

pub use image_sizing::{
    MAX_IMAGE_HEIGHT, TABLET_WIDTH, VIEWPORT_IMAGE_OFFSET, VIEWPORT_IMAGE_REPLY_OFFSET, Viewport,
    calculate_dimensions, nearest_image, preview_filename,
};
pub use link_preview::{ImageSizing, LinkPreview, PreviewLayout, SizeResolution};
pub use url_extractor::UrlExtractor;
