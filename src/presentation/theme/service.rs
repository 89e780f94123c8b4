//! Mattermost theme tokens resolved to terminal colors.

use ratatui::style::Color;

use super::colors::parse_color;
use crate::infrastructure::config::ThemeConfig;

/// Theme tokens the link preview is styled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Theme {
    /// Background of the post list.
    pub center_channel_bg: Color,
    /// Text color of the post list.
    pub center_channel_color: Color,
    /// Color of links.
    pub link_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

impl Theme {
    /// Parses theme tokens given as hex codes or color names.
    ///
    /// Unparsable text colors fall back to the terminal default, links to blue.
    #[must_use]
    pub fn new(center_channel_bg: &str, center_channel_color: &str, link_color: &str) -> Self {
        Self {
            center_channel_bg: parse_color(center_channel_bg, Color::Reset),
            center_channel_color: parse_color(center_channel_color, Color::Reset),
            link_color: parse_color(link_color, Color::Blue),
        }
    }

    /// Theme from the `[theme]` config section.
    #[must_use]
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self::new(
            &config.center_channel_bg,
            &config.center_channel_color,
            &config.link_color,
        )
    }
}
