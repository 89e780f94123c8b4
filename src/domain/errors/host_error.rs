use thiserror::Error;

/// Errors raised when handing work to the host environment.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum HostError {
    #[error("failed to open {target}: {message}")]
    OpenFailed { target: String, message: String },

    #[error("nothing to preview")]
    NothingToPreview,
}

impl HostError {
    /// Creates open failed error.
    #[must_use]
    pub fn open_failed(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            target: target.into(),
            message: message.into(),
        }
    }
}
