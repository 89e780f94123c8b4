//! Link preview metadata fetching and image measuring.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::services::{LinkPreview, SizeResolution};
use crate::domain::entities::{ImageDimensions, ImageMetadataCache, OpenGraphMetadata};
use crate::domain::errors::ApiError;
use crate::domain::events::StoreAction;
use crate::domain::ports::{ChatApiPort, ImageProbePort, ProbeError, StorePort};

/// Result of a background image probe.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Measured image.
    pub url: String,
    /// Natural size or the failure.
    pub result: Result<ImageDimensions, ProbeError>,
}

/// Loads what a link preview needs to render.
#[derive(Clone)]
pub struct LinkPreviewUseCase {
    api: Arc<dyn ChatApiPort>,
    store: Arc<dyn StorePort>,
    probe: Arc<dyn ImageProbePort>,
}

impl LinkPreviewUseCase {
    /// Creates new link preview use case.
    #[must_use]
    pub fn new(
        api: Arc<dyn ChatApiPort>,
        store: Arc<dyn StorePort>,
        probe: Arc<dyn ImageProbePort>,
    ) -> Self {
        Self { api, store, probe }
    }

    /// Fetches Open Graph metadata for `url` unless it is already known.
    ///
    /// Fetched metadata is dispatched to the store and returned. Returns
    /// `None` when `known` was supplied.
    ///
    /// # Errors
    /// Returns error if the metadata request fails.
    pub async fn fetch_metadata(
        &self,
        url: &str,
        known: Option<&OpenGraphMetadata>,
    ) -> Result<Option<OpenGraphMetadata>, ApiError> {
        if known.is_some() {
            return Ok(None);
        }

        debug!(url = %url, "Fetching Open Graph metadata");
        let data = self.api.get_open_graph_metadata(url).await?;

        self.store.dispatch(StoreAction::ReceivedOpenGraphMetadata {
            url: url.to_string(),
            data: data.clone(),
        });

        Ok(Some(data))
    }

    /// Resolves the preview image size, measuring the image if metadata
    /// lacks it.
    ///
    /// A failed probe leaves the preview pending and reports the URL that
    /// still needs measuring.
    pub async fn resolve_image(
        &self,
        preview: &mut LinkPreview,
        images_metadata: &ImageMetadataCache,
        token: &CancellationToken,
    ) -> SizeResolution {
        let url = match preview.resolve_size(images_metadata) {
            SizeResolution::NeedsProbe(url) => url,
            resolved => return resolved,
        };

        match self.probe.probe(&url).await {
            Ok(dimensions) => {
                if preview.apply_probe(&url, dimensions, token) {
                    preview
                        .display_size()
                        .map_or(SizeResolution::NoImage, SizeResolution::Resolved)
                } else {
                    SizeResolution::NeedsProbe(url)
                }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to measure preview image");
                SizeResolution::NeedsProbe(url)
            }
        }
    }

    /// Measures `url` in the background and sends the outcome to `tx`.
    ///
    /// Nothing is sent once `token` is cancelled.
    pub fn spawn_probe(
        &self,
        url: String,
        token: CancellationToken,
        tx: mpsc::UnboundedSender<ProbeOutcome>,
    ) {
        let probe = Arc::clone(&self.probe);
        tokio::spawn(async move {
            let result = tokio::select! {
                () = token.cancelled() => {
                    debug!(url = %url, "Image probe cancelled");
                    return;
                }
                result = probe.probe(&url) => result,
            };

            if token.is_cancelled() {
                return;
            }

            let _ = tx.send(ProbeOutcome { url, result });
        });
    }
}
