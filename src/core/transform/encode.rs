//! Re-encoding to the configured output format.

use crate::error::EncodeError;
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpg,
    Png,
    WebP,
}

impl OutputFormat {
    /// File extension for output naming
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = crate::error::BatchPipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            other => Err(crate::error::BatchPipelineError::Config(format!(
                "unsupported output format '{other}' (jpg, png, webp)"
            ))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serialize a pixel buffer to the configured format.
///
/// Quality (1-100) drives the JPEG encoder. PNG is always lossless;
/// WebP uses the lossless encoder, so quality is accepted but has no
/// effect for those two.
pub fn encode_image(
    image: &RgbaImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if quality == 0 || quality > 100 {
        return Err(EncodeError::InvalidQuality { quality });
    }

    let failed = |e: image::ImageError| EncodeError::EncodingFailed {
        format: format.extension().to_string(),
        reason: e.to_string(),
    };

    let mut buffer = Vec::new();
    match format {
        OutputFormat::Jpg => {
            // JPEG has no alpha channel
            let rgb: RgbImage = image.convert();
            JpegEncoder::new_with_quality(&mut buffer, quality)
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(failed)?;
        }
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer)
                .write_image(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(failed)?;
        }
        OutputFormat::WebP => {
            WebPEncoder::new_lossless(&mut buffer)
                .write_image(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(failed)?;
        }
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn test_image() -> RgbaImage {
        ImageBuffer::from_fn(32, 32, |x, y| {
            Rgba([(x * 8) as u8, (y * 8) as u8, 128, 255])
        })
    }

    #[test]
    fn encodes_all_formats() {
        let image = test_image();
        for format in [OutputFormat::Jpg, OutputFormat::Png, OutputFormat::WebP] {
            let bytes = encode_image(&image, format, 90).unwrap();
            assert!(!bytes.is_empty(), "{format} produced no bytes");
        }
    }

    #[test]
    fn encoded_bytes_decode_back() {
        let image = test_image();
        let bytes = encode_image(&image, OutputFormat::Png, 90).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 32);
        assert_eq!(decoded.height(), 32);
    }

    #[test]
    fn jpeg_quality_changes_size() {
        let image = test_image();
        let high = encode_image(&image, OutputFormat::Jpg, 95).unwrap();
        let low = encode_image(&image, OutputFormat::Jpg, 50).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn invalid_quality_is_rejected() {
        let image = test_image();
        assert!(matches!(
            encode_image(&image, OutputFormat::Jpg, 0),
            Err(EncodeError::InvalidQuality { .. })
        ));
        assert!(matches!(
            encode_image(&image, OutputFormat::Jpg, 101),
            Err(EncodeError::InvalidQuality { .. })
        ));
    }

    #[test]
    fn format_parsing() {
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert!("heic".parse::<OutputFormat>().is_err());
    }
}
