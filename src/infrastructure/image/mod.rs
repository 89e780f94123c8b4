//! Image measuring.

mod probe;

pub use probe::{HttpImageProbe, ImageProbeConfig, dimensions_from_bytes};
