mod link_preview_card;
mod text;

pub use link_preview_card::{
    CELL_HEIGHT_PX, CELL_WIDTH_PX, CardHit, CardLayout, LinkPreviewCard, image_cells,
};
pub use text::{truncate_with_ellipsis, wrap_text};
