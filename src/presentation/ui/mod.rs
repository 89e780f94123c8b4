//! UI screens.

mod preview_screen;
pub mod utils;

pub use preview_screen::PreviewScreen;
