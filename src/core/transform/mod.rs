//! # Transform Module
//!
//! Pure, stateless per-image transforms: aspect crop, brightness and
//! contrast enhancement, and re-encoding. Source files are never
//! mutated; every stage takes a pixel buffer and produces a new one.
//!
//! Which stages run is a closed enum derived from the run parameters,
//! so "what happened to this image" is statically checkable rather than
//! dispatched on strings.

mod crop;
mod encode;
mod enhance;

pub use crop::{crop_to_aspect, AspectRatio, CropSpec, VerticalAlignment};
pub use encode::{encode_image, OutputFormat};
pub use enhance::{apply_enhancement, EnhanceSpec};

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// One pipeline stage with exactly the parameters it needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stage {
    /// Crop to a target aspect ratio
    Crop(CropSpec),
    /// Deterministic brightness/contrast adjustment
    Enhance(EnhanceSpec),
}

/// Apply stages in order, producing the final pixel buffer.
pub fn apply_stages(image: RgbaImage, stages: &[Stage]) -> RgbaImage {
    stages.iter().fold(image, |img, stage| match stage {
        Stage::Crop(spec) => crop_to_aspect(&img, spec),
        Stage::Enhance(spec) => apply_enhancement(img, spec),
    })
}
