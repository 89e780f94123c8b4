//! Host environment actions backed by the desktop.

use tracing::{info, warn};

use crate::domain::errors::HostError;
use crate::domain::ports::{PreviewFile, UiHostPort};

/// Opens links and images with the system's default handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUiHost;

impl SystemUiHost {
    /// Creates a new host.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl UiHostPort for SystemUiHost {
    fn open_link(&self, url: &str) -> Result<(), HostError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(HostError::open_failed(url, "empty link"));
        }

        info!(url = %url, "Opening link");
        opener::open_browser(url).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to open link");
            HostError::open_failed(url, e.to_string())
        })
    }

    fn preview_image(&self, file: &PreviewFile) -> Result<(), HostError> {
        if file.uri.trim().is_empty() {
            return Err(HostError::NothingToPreview);
        }

        info!(uri = %file.uri, caption = %file.caption, "Opening image viewer");
        opener::open(&file.uri).map_err(|e| {
            warn!(uri = %file.uri, error = %e, "Failed to open image viewer");
            HostError::open_failed(&file.uri, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_link_rejected() {
        let result = SystemUiHost::new().open_link("   ");
        assert!(matches!(result, Err(HostError::OpenFailed { .. })));
    }

    #[test]
    fn test_empty_preview_rejected() {
        let file = PreviewFile {
            caption: "og-a.png".to_string(),
            uri: String::new(),
            dimensions: None,
        };

        let result = SystemUiHost::new().preview_image(&file);
        assert!(matches!(result, Err(HostError::NothingToPreview)));
    }
}
