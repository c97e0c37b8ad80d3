/// Errors that abort a frame or reject renderer inputs.
use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid dimensions {width}x{height}: both must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to allocate {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("texture data holds {actual} texels, expected {width}x{height}")]
    TextureSize { width: u32, height: u32, actual: usize },
}
