//! Aspect-ratio cropping.

use crate::error::BatchPipelineError;
use image::imageops;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A target aspect ratio expressed as `width:height`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub w: u32,
    pub h: u32,
}

impl AspectRatio {
    /// Create a ratio; both terms must be non-zero
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w: w.max(1),
            h: h.max(1),
        }
    }

    /// Width over height
    pub fn value(&self) -> f64 {
        self.w as f64 / self.h as f64
    }
}

impl FromStr for AspectRatio {
    type Err = BatchPipelineError;

    /// Parse `"16:9"`-style strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BatchPipelineError::Config(format!("invalid aspect ratio '{s}' (expected w:h)"));

        let (w, h) = s.split_once(':').ok_or_else(bad)?;
        let w: u32 = w.trim().parse().map_err(|_| bad())?;
        let h: u32 = h.trim().parse().map_err(|_| bad())?;
        if w == 0 || h == 0 {
            return Err(bad());
        }
        Ok(AspectRatio { w, h })
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.w, self.h)
    }
}

/// Where the crop window sits vertically. Horizontal placement is
/// always centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Keep the top, cut the bottom
    Top,
    Center,
    /// Keep the bottom, cut the top
    Bottom,
}

/// Parameters for the crop stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSpec {
    pub ratio: AspectRatio,
    pub alignment: VerticalAlignment,
}

/// Crop to the largest rectangle of the requested ratio that fits.
///
/// If the image is wider than the target ratio, height is preserved and
/// width derived; otherwise width is preserved and height derived.
/// Output dimensions never exceed input dimensions, and the output
/// ratio matches the request within one-pixel rounding.
pub fn crop_to_aspect(image: &RgbaImage, spec: &CropSpec) -> RgbaImage {
    let current_width = image.width() as f64;
    let current_height = image.height() as f64;
    let ratio = spec.ratio.value();

    let (target_width, target_height) = if current_width / current_height > ratio {
        (current_height * ratio, current_height)
    } else {
        (current_width, current_width / ratio)
    };

    let target_width = (target_width.round() as u32).clamp(1, image.width());
    let target_height = (target_height.round() as u32).clamp(1, image.height());

    let x = (image.width() - target_width) / 2;
    let y = match spec.alignment {
        VerticalAlignment::Top => 0,
        VerticalAlignment::Bottom => image.height() - target_height,
        VerticalAlignment::Center => (image.height() - target_height) / 2,
    };

    imageops::crop_imm(image, x, y, target_width, target_height).to_image()
}
