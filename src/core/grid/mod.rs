//! # Grid Module
//!
//! Detects and splits screenshots that contain several independent
//! pictures (contact sheets, collage exports, chat screenshots).
//!
//! Two modes:
//! - **Auto** ([`GridDetector`]): Sobel edge detection plus flood-fill
//!   region extraction; finds irregular layouts without knowing the grid
//!   shape in advance.
//! - **Fixed** ([`split_fixed`]): deterministic equal-cell partition for
//!   callers that already know the rows x columns layout.
//!
//! Each extracted region re-enters the transform pipeline independently
//! and produces its own processing record.

mod detector;
mod fixed;

pub use detector::GridDetector;
pub use fixed::split_fixed;

use image::imageops;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// A rectangle denoting a candidate sub-image inside a larger image.
///
/// Produced transiently by detection and consumed immediately to extract
/// an independent pixel copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GridRegion {
    /// Area in pixels
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether two regions' bounding boxes overlap
    pub fn overlaps(&self, other: &GridRegion) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// The union of two bounding boxes
    pub fn union(&self, other: &GridRegion) -> GridRegion {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        GridRegion {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// Grid handling for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridMode {
    /// Never split
    Off,
    /// Edge-detection based auto-splitting, sensitivity 0-100
    Auto { sensitivity: u8 },
    /// Deterministic rows x cols partition
    Fixed { rows: u32, cols: u32 },
}

/// Extract one region as an independent image.
///
/// A direct sub-copy of the source pixel buffer; no scaling, no
/// distortion. The region is clamped to the image bounds.
pub fn extract_region(image: &RgbaImage, region: &GridRegion) -> RgbaImage {
    let x = region.x.min(image.width().saturating_sub(1));
    let y = region.y.min(image.height().saturating_sub(1));
    let width = region.width.min(image.width() - x);
    let height = region.height.min(image.height() - y);
    imageops::crop_imm(image, x, y, width, height).to_image()
}
