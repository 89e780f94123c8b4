//! Remote image measuring.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use image::ImageReader;
use tracing::{debug, trace};

use crate::domain::entities::ImageDimensions;
use crate::domain::ports::{ImageProbePort, ProbeError};

/// Configuration for the image probe.
#[derive(Debug, Clone)]
pub struct ImageProbeConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ImageProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Downloads images and reads their natural size from the header.
#[derive(Debug, Clone)]
pub struct HttpImageProbe {
    http_client: reqwest::Client,
}

impl HttpImageProbe {
    /// Creates a new probe.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &ImageProbeConfig) -> Result<Self, ProbeError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProbeError::NetworkError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    async fn download(&self, url: &str) -> Result<Bytes, ProbeError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeError::NetworkError(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ProbeError::NetworkError(format!(
                "HTTP {}: {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| ProbeError::NetworkError(format!("Failed to read body: {e}")))
    }
}

#[async_trait]
impl ImageProbePort for HttpImageProbe {
    async fn probe(&self, url: &str) -> Result<ImageDimensions, ProbeError> {
        debug!(url = %url, "Measuring image");
        let bytes = self.download(url).await?;

        let dimensions = tokio::task::spawn_blocking(move || dimensions_from_bytes(&bytes))
            .await
            .map_err(|e| ProbeError::DecodeError(format!("Decode task panicked: {e}")))??;

        trace!(url = %url, ?dimensions, "Image measured");
        Ok(dimensions)
    }
}

/// Reads the natural size from encoded image bytes without decoding pixels.
///
/// # Errors
/// Returns error if the format is unknown or the header is unreadable.
pub fn dimensions_from_bytes(bytes: &[u8]) -> Result<ImageDimensions, ProbeError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProbeError::DecodeError(format!("Unknown format: {e}")))?
        .into_dimensions()
        .map_err(|e| ProbeError::DecodeError(format!("Decode failed: {e}")))?;

    ImageDimensions::from_parts(Some(width), Some(height))
        .ok_or_else(|| ProbeError::DecodeError("Image has no area".to_string()))
}
