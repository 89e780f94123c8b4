//! Link preview state: best image selection and size resolution.

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::image_sizing::{Viewport, calculate_dimensions, nearest_image, preview_filename};
use crate::domain::entities::{ImageDimensions, ImageMetadataCache, OpenGraphMetadata};
use crate::domain::ports::PreviewFile;

/// Where the preview is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewLayout {
    /// Device screen.
    pub viewport: Viewport,
    /// The post is shown indented as a reply.
    pub is_reply: bool,
}

impl PreviewLayout {
    /// Creates a layout.
    #[must_use]
    pub const fn new(viewport: Viewport, is_reply: bool) -> Self {
        Self { viewport, is_reply }
    }

    /// Width available to the image.
    #[must_use]
    pub fn image_width(&self) -> u32 {
        self.viewport.post_width(self.is_reply)
    }
}

/// Sizing progress of the preview image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageSizing {
    /// No metadata or no candidate image.
    #[default]
    NoImage,
    /// Image chosen, natural size not confirmed yet.
    Pending {
        /// Chosen image.
        image_url: String,
        /// Size to reserve until the real one is known.
        provisional: ImageDimensions,
    },
    /// Natural size known.
    Sized {
        /// Chosen image.
        image_url: String,
        /// Natural size.
        original: ImageDimensions,
        /// Size to render at.
        display: ImageDimensions,
    },
}

/// Outcome of [`LinkPreview::resolve_size`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeResolution {
    /// Nothing to size.
    NoImage,
    /// Size is known; carries the display size.
    Resolved(ImageDimensions),
    /// Metadata has no size; the image at this URL must be measured.
    NeedsProbe(String),
}

/// Preview card for a link found in a post.
#[derive(Debug, Clone)]
pub struct LinkPreview {
    link: String,
    open_graph: Option<OpenGraphMetadata>,
    layout: PreviewLayout,
    sizing: ImageSizing,
}

impl LinkPreview {
    /// Creates a preview and selects its image.
    #[must_use]
    pub fn new(
        link: impl Into<String>,
        open_graph: Option<OpenGraphMetadata>,
        layout: PreviewLayout,
        images_metadata: &ImageMetadataCache,
    ) -> Self {
        let mut preview = Self {
            link: link.into(),
            open_graph,
            layout,
            sizing: ImageSizing::NoImage,
        };
        preview.select_image(images_metadata);
        preview
    }

    /// Previewed link.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Metadata currently shown.
    #[must_use]
    pub const fn open_graph(&self) -> Option<&OpenGraphMetadata> {
        self.open_graph.as_ref()
    }

    /// Current layout.
    #[must_use]
    pub const fn layout(&self) -> PreviewLayout {
        self.layout
    }

    /// Current sizing state.
    #[must_use]
    pub const fn sizing(&self) -> &ImageSizing {
        &self.sizing
    }

    /// Chosen image, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match &self.sizing {
            ImageSizing::NoImage => None,
            ImageSizing::Pending { image_url, .. } | ImageSizing::Sized { image_url, .. } => {
                Some(image_url)
            }
        }
    }

    /// Size the image box currently occupies.
    #[must_use]
    pub const fn display_size(&self) -> Option<ImageDimensions> {
        match &self.sizing {
            ImageSizing::NoImage => None,
            ImageSizing::Pending { provisional, .. } => Some(*provisional),
            ImageSizing::Sized { display, .. } => Some(*display),
        }
    }

    /// Text of the clickable title line.
    #[must_use]
    pub fn title(&self) -> &str {
        let og = self.open_graph.as_ref();
        og.and_then(|og| og.title.as_deref())
            .filter(|t| !t.is_empty())
            .or_else(|| og.and_then(|og| og.url.as_deref()).filter(|u| !u.is_empty()))
            .unwrap_or(&self.link)
    }

    /// Points the preview at another link.
    ///
    /// Returns true if the link changed; the old metadata is dropped and
    /// must be fetched again for the new link.
    pub fn set_link(&mut self, link: impl Into<String>) -> bool {
        let link = link.into();
        if link == self.link {
            return false;
        }

        debug!(link = %link, "Link preview target changed");
        self.link = link;
        self.open_graph = None;
        self.sizing = ImageSizing::NoImage;
        true
    }

    /// Supplies new Open Graph metadata. Returns false if nothing changed.
    pub fn set_open_graph(
        &mut self,
        open_graph: Option<OpenGraphMetadata>,
        images_metadata: &ImageMetadataCache,
    ) -> bool {
        if open_graph == self.open_graph {
            return false;
        }

        self.open_graph = open_graph;
        self.select_image(images_metadata);
        true
    }

    /// Re-lays the preview out for a new screen.
    pub fn set_layout(&mut self, layout: PreviewLayout) {
        if layout == self.layout {
            return;
        }

        self.layout = layout;
        let width = layout.image_width();
        match &mut self.sizing {
            ImageSizing::NoImage => {}
            ImageSizing::Pending { provisional, .. } => {
                *provisional = ImageDimensions::new(width, provisional.height);
            }
            ImageSizing::Sized {
                original, display, ..
            } => {
                *display = calculate_dimensions(*original, width);
            }
        }
    }

    /// Resolves the image size from metadata.
    ///
    /// An image that is already sized is reported as resolved without
    /// consulting metadata again.
    pub fn resolve_size(&mut self, images_metadata: &ImageMetadataCache) -> SizeResolution {
        let image_url = match &self.sizing {
            ImageSizing::NoImage => return SizeResolution::NoImage,
            ImageSizing::Sized { display, .. } => return SizeResolution::Resolved(*display),
            ImageSizing::Pending { image_url, .. } => image_url.clone(),
        };

        match self.known_dimensions(&image_url, images_metadata) {
            Some(original) => {
                let size = calculate_dimensions(original, self.layout.image_width());
                trace!(url = %image_url, ?size, "Preview image sized from metadata");
                self.sizing = ImageSizing::Sized {
                    image_url,
                    original,
                    display: size,
                };
                SizeResolution::Resolved(size)
            }
            None => SizeResolution::NeedsProbe(image_url),
        }
    }

    /// Applies a measured natural size.
    ///
    /// Ignored when `token` is cancelled or `image_url` is no longer the
    /// pending image. Returns true if the preview changed.
    pub fn apply_probe(
        &mut self,
        image_url: &str,
        original: ImageDimensions,
        token: &CancellationToken,
    ) -> bool {
        if token.is_cancelled() {
            trace!(url = %image_url, "Dropping probe result for cancelled preview");
            return false;
        }

        let is_pending = matches!(
            &self.sizing,
            ImageSizing::Pending { image_url: pending, .. } if pending == image_url
        );
        if !is_pending {
            trace!(url = %image_url, "Dropping stale probe result");
            return false;
        }

        let display = calculate_dimensions(original, self.layout.image_width());
        self.sizing = ImageSizing::Sized {
            image_url: image_url.to_string(),
            original,
            display,
        };
        true
    }

    /// File for the full-screen viewer; only once the image is sized.
    #[must_use]
    pub fn preview_file(&self) -> Option<PreviewFile> {
        match &self.sizing {
            ImageSizing::Sized {
                image_url,
                original,
                ..
            } => Some(PreviewFile {
                caption: preview_filename(image_url),
                uri: image_url.clone(),
                dimensions: Some(*original),
            }),
            _ => None,
        }
    }

    fn select_image(&mut self, images_metadata: &ImageMetadataCache) {
        let Some(og) = self.open_graph.as_ref().filter(|og| og.has_images()) else {
            self.sizing = ImageSizing::NoImage;
            return;
        };

        let target = self.layout.viewport.target_box(self.layout.is_reply);
        let Some(image_url) =
            nearest_image(target, og.images()).and_then(|image| image.preferred_url())
        else {
            self.sizing = ImageSizing::NoImage;
            return;
        };
        let image_url = image_url.to_string();

        let provisional = self
            .known_dimensions(&image_url, images_metadata)
            .map_or(target, |d| calculate_dimensions(d, target.width));

        self.sizing = ImageSizing::Pending {
            image_url,
            provisional,
        };
    }

    fn known_dimensions(
        &self,
        image_url: &str,
        images_metadata: &ImageMetadataCache,
    ) -> Option<ImageDimensions> {
        images_metadata
            .get(image_url)
            .and_then(|m| m.dimensions())
            .or_else(|| {
                self.open_graph
                    .as_ref()?
                    .images()
                    .iter()
                    .find(|image| image.matches_url(image_url))?
                    .dimensions()
            })
            .or_else(|| images_metadata.first_with_dimensions())
    }
}
