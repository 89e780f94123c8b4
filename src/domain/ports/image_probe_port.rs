//! Port for measuring remote images.

use crate::domain::entities::ImageDimensions;

/// Errors that can occur while probing an image.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProbeError {
    /// Download failed.
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Bytes could not be read as an image.
    #[error("Decode error: {0}")]
    DecodeError(String),
}

/// Port for obtaining the natural size of a remote image.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageProbePort: Send + Sync {
    /// Returns the image's natural dimensions.
    async fn probe(&self, url: &str) -> Result<ImageDimensions, ProbeError>;
}
