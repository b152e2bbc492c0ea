//! Raster codec boundary.
//!
//! The pipeline treats decoding and encoding as an injected capability
//! so tests can substitute deterministic fakes and future callers can
//! bring faster decoders without touching the orchestrator.

use crate::core::transform::{encode_image, OutputFormat};
use crate::error::{DecodeError, EncodeError};
use image::RgbaImage;

/// Decode and encode capability used by the batch orchestrator.
pub trait RasterCodec: Send + Sync {
    /// Decode raw bytes into a pixel buffer.
    ///
    /// `name` is only for error context.
    fn decode(&self, bytes: &[u8], name: &str) -> Result<RgbaImage, DecodeError>;

    /// Serialize a pixel buffer to the output format at the given
    /// quality percentage.
    fn encode(
        &self,
        image: &RgbaImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// Default codec backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCodec;

impl RasterCodec for ImageCodec {
    fn decode(&self, bytes: &[u8], name: &str) -> Result<RgbaImage, DecodeError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| DecodeError::InvalidImage {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(DecodeError::EmptyImage {
                name: name.to_string(),
            });
        }

        Ok(decoded.to_rgba8())
    }

    fn encode(
        &self,
        image: &RgbaImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Vec<u8>, EncodeError> {
        encode_image(image, format, quality)
    }
}
