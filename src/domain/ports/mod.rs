mod chat_api_port;
mod image_probe_port;
mod store_port;
mod ui_host_port;

pub use chat_api_port::{ChatApiPort, PostActionResponse};
#[cfg(test)]
pub use image_probe_port::MockImageProbePort;
pub use image_probe_port::{ImageProbePort, ProbeError};
pub use store_port::StorePort;
pub use ui_host_port::{PreviewFile, UiHostPort};

#[cfg(test)]
pub mod mocks {
    pub use super::chat_api_port::mock::{ApiCall, MockChatApi};
    pub use super::store_port::mock::RecordingStore;
    pub use super::ui_host_port::mock::RecordingUiHost;
}
