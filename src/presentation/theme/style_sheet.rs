//! Memoized link preview styles.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use ratatui::style::{Modifier, Style};
use tracing::trace;

use super::colors::change_opacity;
use super::service::Theme;

/// Default number of themes kept.
pub const DEFAULT_STYLE_CACHE_SIZE: usize = 4;

/// Styles of the link preview card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPreviewStyles {
    /// Card border.
    pub container: Style,
    /// Site name line.
    pub site_title: Style,
    /// Clickable title.
    pub site_subtitle: Style,
    /// Description text.
    pub site_description: Style,
    /// Image box border and caption.
    pub image_container: Style,
}

impl LinkPreviewStyles {
    /// Derives the styles from theme tokens.
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        let bg = theme.center_channel_bg;
        let fg = theme.center_channel_color;
        let faded = |opacity| Style::default().fg(change_opacity(fg, opacity, bg));

        Self {
            container: faded(0.2),
            site_title: faded(0.5),
            site_subtitle: Style::default()
                .fg(theme.link_color)
                .add_modifier(Modifier::UNDERLINED),
            site_description: faded(0.7),
            image_container: faded(0.2),
        }
    }
}

/// Styles memoized per theme.
#[derive(Debug, Clone)]
pub struct StyleSheetCache {
    cache: Arc<Mutex<LruCache<Theme, LinkPreviewStyles>>>,
}

impl Default for StyleSheetCache {
    fn default() -> Self {
        Self::new(DEFAULT_STYLE_CACHE_SIZE)
    }
}

impl StyleSheetCache {
    /// Creates a cache keeping `capacity` themes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(cap))),
        }
    }

    /// Styles for `theme`, computed once per theme.
    pub fn get(&self, theme: &Theme) -> LinkPreviewStyles {
        let mut cache = self.cache.lock();
        if let Some(styles) = cache.get(theme) {
            return *styles;
        }

        trace!(?theme, "Building link preview styles");
        let styles = LinkPreviewStyles::from_theme(theme);
        cache.put(*theme, styles);
        styles
    }

    /// Number of memoized themes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if nothing is memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn test_styles_from_theme() {
        let theme = Theme::new("#ffffff", "#000000", "#0000ff");
        let styles = LinkPreviewStyles::from_theme(&theme);

        let gray = |style: Style| match style.fg {
            Some(Color::Rgb(r, g, b)) if r == g && g == b => r,
            other => panic!("expected a gray, got {other:?}"),
        };

        assert_eq!(styles.site_subtitle.fg, Some(Color::Rgb(0, 0, 255)));
        assert!(gray(styles.site_title).abs_diff(128) <= 1);
        assert!(gray(styles.container).abs_diff(204) <= 1);
    }

    #[test]
    fn test_cache_memoizes_per_theme() {
        let cache = StyleSheetCache::new(2);
        let light = Theme::default();
        let dark = Theme::new("#000000", "#ffffff", "#00ffff");

        let first = cache.get(&light);
        assert_eq!(cache.get(&light), first);
        assert_eq!(cache.len(), 1);

        assert_ne!(cache.get(&dark), first);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_evicts_least_recent() {
        let cache = StyleSheetCache::new(1);
        cache.get(&Theme::default());
        cache.get(&Theme::new("#000000", "#ffffff", "#00ffff"));

        assert_eq!(cache.len(), 1);
    }
}
