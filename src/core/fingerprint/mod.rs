//! # Fingerprint Module
//!
//! Perceptual fingerprints for duplicate detection.
//!
//! A fingerprint is a 64-bit summary of an image's coarse brightness
//! pattern: the image is downsampled to 8x8, converted to grayscale, and
//! each cell contributes one bit (1 if brighter than the mean). Robust to
//! resizing and recompression, which is what makes it usable for
//! duplicate detection across re-saved copies.
//!
//! ## Comparison
//! Hamming distance = number of differing bits. With 64 bits, a distance
//! of 5 corresponds to roughly 92% similarity.

mod grouping;
mod index;

pub use grouping::{group_duplicates, DuplicateGroup, FingerprintedFile};
pub use index::{DedupIndex, DedupMode, THRESHOLD_MODE_SOFT_LIMIT};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Downsample grid edge; the fingerprint has `GRID * GRID` bits.
const GRID: u32 = 8;

/// A 64-bit perceptual fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Compute the fingerprint of a decoded image.
    ///
    /// Uses a low-cost triangle resize; the 8x8 downsample throws away
    /// almost all detail anyway, so an expensive filter buys nothing.
    pub fn from_image(image: &RgbaImage) -> Self {
        let small = imageops::resize(image, GRID, GRID, FilterType::Triangle);

        let mut brightness = [0f64; (GRID * GRID) as usize];
        for (i, pixel) in small.pixels().enumerate() {
            let [r, g, b, _] = pixel.0;
            brightness[i] = (r as f64 + g as f64 + b as f64) / 3.0;
        }

        let mean: f64 = brightness.iter().sum::<f64>() / brightness.len() as f64;

        // One bit per cell, row-major, most significant bit first
        let mut bits: u64 = 0;
        for (i, &cell) in brightness.iter().enumerate() {
            if cell > mean {
                bits |= 1 << (63 - i);
            }
        }

        Fingerprint(bits)
    }

    /// Rebuild a fingerprint from its raw bits
    pub fn from_bits(bits: u64) -> Self {
        Fingerprint(bits)
    }

    /// Raw bits, row-major from the most significant bit
    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Hamming distance: the count of differing bit positions.
    ///
    /// Symmetric, and zero only for identical fingerprints.
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Similarity as a percentage (0-100)
    pub fn similarity(&self, other: &Fingerprint) -> f64 {
        (1.0 - (self.distance(other) as f64 / 64.0)) * 100.0
    }

    /// Hexadecimal rendering, used by the `{hash}` naming placeholder
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn solid_image(r: u8, g: u8, b: u8) -> RgbaImage {
        ImageBuffer::from_fn(100, 100, |_, _| Rgba([r, g, b, 255]))
    }

    fn half_and_half() -> RgbaImage {
        ImageBuffer::from_fn(100, 100, |x, _| {
            if x < 50 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn identical_images_produce_identical_fingerprints() {
        let image = half_and_half();
        let a = Fingerprint::from_image(&image);
        let b = Fingerprint::from_image(&image);
        assert_eq!(a, b);
        assert_eq!(a.distance(&b), 0);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let fp = Fingerprint::from_bits(0xDEAD_BEEF_0BAD_F00D);
        assert_eq!(fp.distance(&fp), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Fingerprint::from_bits(0xFF00_FF00_FF00_FF00);
        let b = Fingerprint::from_bits(0x0F0F_0F0F_0F0F_0F0F);
        assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn distance_counts_differing_bits() {
        let a = Fingerprint::from_bits(u64::MAX);
        let b = Fingerprint::from_bits(0);
        assert_eq!(a.distance(&b), 64);
    }

    #[test]
    fn solid_image_produces_uniform_fingerprint() {
        // No cell is strictly brighter than the mean of a solid color
        let fp = Fingerprint::from_image(&solid_image(128, 128, 128));
        assert_eq!(fp.bits(), 0);
    }

    #[test]
    fn half_bright_image_sets_half_the_bits() {
        let fp = Fingerprint::from_image(&half_and_half());
        assert_eq!(fp.bits().count_ones(), 32);
    }

    #[test]
    fn similarity_spans_full_range() {
        let a = Fingerprint::from_bits(u64::MAX);
        let b = Fingerprint::from_bits(0);
        assert_eq!(a.similarity(&a), 100.0);
        assert_eq!(a.similarity(&b), 0.0);
    }

    #[test]
    fn to_hex_is_stable_width() {
        assert_eq!(Fingerprint::from_bits(0xAB).to_hex(), "00000000000000ab");
    }
}
