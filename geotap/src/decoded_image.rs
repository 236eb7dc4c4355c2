//! This module contains utilities for loading marker images to be rendered on
//! the map.

use crate::error::GeotapError;

/// An image that has been loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    bytes: Vec<u8>,
    dimensions: (u32, u32),
}

impl DecodedImage {
    /// Decode an image from a byte slice.
    ///
    /// Attempts to guess the format of the image from the data. Non-RGBA
    /// images will be converted to RGBA.
    #[cfg(feature = "image")]
    pub fn new(bytes: &[u8]) -> Result<Self, GeotapError> {
        use image::GenericImageView;
        let decoded = image::load_from_memory(bytes)?;
        let bytes = decoded.to_rgba8();
        let dimensions = decoded.dimensions();

        Ok(Self {
            bytes: bytes.into_vec(),
            dimensions,
        })
    }

    /// Creates an image from raw RGBA bytes.
    ///
    /// The buffer length must be exactly `width * height * 4`.
    pub fn from_raw(bytes: Vec<u8>, width: u32, height: u32) -> Result<Self, GeotapError> {
        if bytes.len() != (width as usize) * (height as usize) * 4 {
            return Err(GeotapError::Generic(format!(
                "invalid buffer length {} for {width}x{height} RGBA image",
                bytes.len()
            )));
        }

        Ok(Self {
            bytes,
            dimensions: (width, height),
        })
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }

    /// Raw bytes of the image, in RGBA order.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_checks_length() {
        assert!(DecodedImage::from_raw(vec![0; 16], 2, 2).is_ok());
        assert!(DecodedImage::from_raw(vec![0; 15], 2, 2).is_err());
    }
}
