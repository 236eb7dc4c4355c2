//! Error types used by the crate.

use thiserror::Error;

#[cfg(feature = "image")]
use image::ImageError;

/// Geotap error type.
#[derive(Debug, Error)]
pub enum GeotapError {
    /// Image decoding error.
    #[cfg(feature = "image")]
    #[error("image decode error: {0:?}")]
    ImageDecode(#[from] ImageError),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
}
