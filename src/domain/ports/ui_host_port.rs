//! Port for host environment actions.

use crate::domain::entities::ImageDimensions;
use crate::domain::errors::HostError;

/// File handed to the full-screen image viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFile {
    /// Caption shown by the viewer.
    pub caption: String,
    /// Location of the image.
    pub uri: String,
    /// Natural size, when known.
    pub dimensions: Option<ImageDimensions>,
}

/// Port for actions performed by the host environment.
pub trait UiHostPort: Send + Sync {
    /// Opens an external link in the system browser.
    ///
    /// # Errors
    /// Returns error if the host cannot open the link.
    fn open_link(&self, url: &str) -> Result<(), HostError>;

    /// Shows an image in the full-screen viewer.
    ///
    /// # Errors
    /// Returns error if the host cannot show the image.
    fn preview_image(&self, file: &PreviewFile) -> Result<(), HostError>;
}

#[cfg(test)]
pub mod mock {
    use parking_lot::Mutex;

    use super::*;

    /// Host double that records requests.
    #[derive(Default)]
    pub struct RecordingUiHost {
        links: Mutex<Vec<String>>,
        previews: Mutex<Vec<PreviewFile>>,
    }

    impl RecordingUiHost {
        /// Creates an empty recorder.
        pub fn new() -> Self {
            Self::default()
        }

        /// Links opened so far.
        pub fn links(&self) -> Vec<String> {
            self.links.lock().clone()
        }

        /// Images previewed so far.
        pub fn previews(&self) -> Vec<PreviewFile> {
            self.previews.lock().clone()
        }
    }

    impl UiHostPort for RecordingUiHost {
        fn open_link(&self, url: &str) -> Result<(), HostError> {
            self.links.lock().push(url.to_string());
            Ok(())
        }

        fn preview_image(&self, file: &PreviewFile) -> Result<(), HostError> {
            self.previews.lock().push(file.clone());
            Ok(())
        }
    }
}
