//! Theme tokens and derived styles.

mod colors;
mod service;
mod style_sheet;

pub use colors::{change_opacity, parse_color, to_rgb};
pub use service::Theme;
pub use style_sheet::{DEFAULT_STYLE_CACHE_SIZE, LinkPreviewStyles, StyleSheetCache};
