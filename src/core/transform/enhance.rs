//! Deterministic brightness/contrast enhancement.
//!
//! Exactly two knobs. Brightness is a per-channel multiplicative scale;
//! contrast uses the standard `259(C+255) / (255(259-C))` factor applied
//! as `factor * (channel - 128) + 128`. Both clamp to [0, 255] and leave
//! alpha untouched. There is deliberately no sharpening stage.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Parameters for the enhancement stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhanceSpec {
    /// Brightness adjustment in percent (10 = +10%)
    pub brightness: i32,
    /// Contrast adjustment, -255 to 255
    pub contrast: i32,
}

impl Default for EnhanceSpec {
    /// The auto-enhance defaults: +10% brightness, +15 contrast
    fn default() -> Self {
        Self {
            brightness: 10,
            contrast: 15,
        }
    }
}

/// Apply brightness then contrast in place and return the buffer.
pub fn apply_enhancement(mut image: RgbaImage, spec: &EnhanceSpec) -> RgbaImage {
    let bright_factor = 1.0 + spec.brightness as f64 / 100.0;
    let c = spec.contrast.clamp(-255, 255) as f64;
    let contrast_factor = (259.0 * (c + 255.0)) / (255.0 * (259.0 - c));

    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            let brightened = (*channel as f64 * bright_factor).clamp(0.0, 255.0);
            let contrasted = (contrast_factor * (brightened - 128.0) + 128.0).clamp(0.0, 255.0);
            *channel = contrasted as u8;
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn uniform(value: u8) -> RgbaImage {
        ImageBuffer::from_pixel(4, 4, Rgba([value, value, value, 200]))
    }

    #[test]
    fn neutral_spec_is_identity() {
        let spec = EnhanceSpec {
            brightness: 0,
            contrast: 0,
        };
        let out = apply_enhancement(uniform(100), &spec);
        assert_eq!(out.get_pixel(0, 0).0, [100, 100, 100, 200]);
    }

    #[test]
    fn brightness_scales_channels() {
        let spec = EnhanceSpec {
            brightness: 10,
            contrast: 0,
        };
        let out = apply_enhancement(uniform(100), &spec);
        assert_eq!(out.get_pixel(0, 0).0[0], 110);
    }

    #[test]
    fn contrast_pushes_away_from_midpoint() {
        let spec = EnhanceSpec {
            brightness: 0,
            contrast: 15,
        };

        let bright = apply_enhancement(uniform(200), &spec);
        let dark = apply_enhancement(uniform(50), &spec);

        assert!(bright.get_pixel(0, 0).0[0] > 200);
        assert!(dark.get_pixel(0, 0).0[0] < 50);
    }

    #[test]
    fn midpoint_is_a_contrast_fixpoint() {
        let spec = EnhanceSpec {
            brightness: 0,
            contrast: 40,
        };
        let out = apply_enhancement(uniform(128), &spec);
        assert_eq!(out.get_pixel(0, 0).0[0], 128);
    }

    #[test]
    fn results_are_clamped() {
        let spec = EnhanceSpec {
            brightness: 50,
            contrast: 100,
        };

        let high = apply_enhancement(uniform(250), &spec);
        let low = apply_enhancement(uniform(2), &spec);

        assert_eq!(high.get_pixel(0, 0).0[0], 255);
        assert_eq!(low.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn alpha_is_untouched() {
        let out = apply_enhancement(uniform(100), &EnhanceSpec::default());
        assert_eq!(out.get_pixel(0, 0).0[3], 200);
    }

    #[test]
    fn enhancement_is_deterministic() {
        let a = apply_enhancement(uniform(73), &EnhanceSpec::default());
        let b = apply_enhancement(uniform(73), &EnhanceSpec::default());
        assert_eq!(a, b);
    }
}
