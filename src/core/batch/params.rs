//! Immutable run configuration.

use crate::core::fingerprint::DedupMode;
use crate::core::grid::GridMode;
use crate::core::transform::{CropSpec, EnhanceSpec, OutputFormat, Stage};
use crate::error::BatchPipelineError;
use serde::{Deserialize, Serialize};

/// Default output filename template.
pub const DEFAULT_NAMING_TEMPLATE: &str = "processed_{index}_{original}";

/// Everything a run needs, captured before the first unit starts.
///
/// The orchestrator never reads configuration from anywhere else, so a
/// run's behavior is a pure function of this snapshot plus the source
/// bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingParameters {
    /// Duplicate rejection; `None` disables the dedup step
    pub dedup: Option<DedupMode>,
    /// Aspect crop stage; `None` skips cropping
    pub crop: Option<CropSpec>,
    /// Brightness/contrast stage; `None` skips enhancement
    pub enhance: Option<EnhanceSpec>,
    /// Multi-image splitting
    pub grid: GridMode,
    /// Whether junk-extension files are rejected
    pub delete_junk: bool,
    /// Extensions treated as junk (compared lowercase, no dot)
    pub junk_formats: Vec<String>,
    /// Source extensions accepted for processing; empty = accept all
    /// known raster extensions
    pub allowed_formats: Vec<String>,
    /// Minimum source size in KiB; 0 = unbounded
    pub min_size_kb: u64,
    /// Maximum source size in KiB; 0 = unbounded
    pub max_size_kb: u64,
    /// Minimum decoded width in pixels; 0 = unbounded
    pub min_resolution: u32,
    /// Maximum decoded width in pixels; 0 = unbounded
    pub max_resolution: u32,
    pub output_format: OutputFormat,
    /// Encoder quality, 1-100
    pub quality: u8,
    /// Output filename template with `{index}`, `{original}`, `{date}`,
    /// `{hash}` placeholders
    pub naming_template: String,
}

impl Default for ProcessingParameters {
    fn default() -> Self {
        Self {
            dedup: Some(DedupMode::default_threshold()),
            crop: None,
            enhance: None,
            grid: GridMode::Off,
            delete_junk: true,
            junk_formats: vec!["tmp".to_string(), "gif".to_string()],
            allowed_formats: Vec::new(),
            min_size_kb: 0,
            max_size_kb: 0,
            min_resolution: 0,
            max_resolution: 0,
            output_format: OutputFormat::Jpg,
            quality: 90,
            naming_template: DEFAULT_NAMING_TEMPLATE.to_string(),
        }
    }
}

impl ProcessingParameters {
    /// Reject configurations that can never produce a valid run.
    pub fn validate(&self) -> Result<(), BatchPipelineError> {
        if self.quality == 0 || self.quality > 100 {
            return Err(BatchPipelineError::Config(format!(
                "quality must be 1-100, got {}",
                self.quality
            )));
        }
        if self.max_size_kb != 0 && self.min_size_kb > self.max_size_kb {
            return Err(BatchPipelineError::Config(format!(
                "min size {} KiB exceeds max size {} KiB",
                self.min_size_kb, self.max_size_kb
            )));
        }
        if self.max_resolution != 0 && self.min_resolution > self.max_resolution {
            return Err(BatchPipelineError::Config(format!(
                "min resolution {} exceeds max resolution {}",
                self.min_resolution, self.max_resolution
            )));
        }
        if self.naming_template.trim().is_empty() {
            return Err(BatchPipelineError::Config(
                "naming template must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Pixel stages implied by this configuration, in execution order.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::new();
        if let Some(crop) = self.crop {
            stages.push(Stage::Crop(crop));
        }
        if let Some(enhance) = self.enhance {
            stages.push(Stage::Enhance(enhance));
        }
        stages
    }

    /// Whether `size` bytes falls inside the configured KiB window.
    pub fn size_in_range(&self, size: u64) -> bool {
        let kb = size / 1024;
        if self.min_size_kb != 0 && kb < self.min_size_kb {
            return false;
        }
        if self.max_size_kb != 0 && kb > self.max_size_kb {
            return false;
        }
        true
    }

    /// Whether a decoded width falls inside the configured window.
    pub fn resolution_in_range(&self, width: u32) -> bool {
        if self.min_resolution != 0 && width < self.min_resolution {
            return false;
        }
        if self.max_resolution != 0 && width > self.max_resolution {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::{AspectRatio, VerticalAlignment};

    #[test]
    fn defaults_are_valid() {
        assert!(ProcessingParameters::default().validate().is_ok());
    }

    #[test]
    fn bad_quality_is_rejected() {
        let params = ProcessingParameters {
            quality: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn inverted_size_window_is_rejected() {
        let params = ProcessingParameters {
            min_size_kb: 500,
            max_size_kb: 100,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_bounds_mean_unbounded() {
        let params = ProcessingParameters::default();
        assert!(params.size_in_range(0));
        assert!(params.size_in_range(u64::MAX));
        assert!(params.resolution_in_range(1));
        assert!(params.resolution_in_range(u32::MAX));
    }

    #[test]
    fn size_window_is_inclusive() {
        let params = ProcessingParameters {
            min_size_kb: 10,
            max_size_kb: 20,
            ..Default::default()
        };
        assert!(!params.size_in_range(9 * 1024));
        assert!(params.size_in_range(10 * 1024));
        assert!(params.size_in_range(20 * 1024));
        assert!(!params.size_in_range(21 * 1024));
    }

    #[test]
    fn stages_follow_configuration() {
        let params = ProcessingParameters {
            crop: Some(CropSpec {
                ratio: AspectRatio::new(16, 9),
                alignment: VerticalAlignment::Center,
            }),
            enhance: Some(EnhanceSpec::default()),
            ..Default::default()
        };

        let stages = params.stages();
        assert_eq!(stages.len(), 2);
        assert!(matches!(stages[0], Stage::Crop(_)));
        assert!(matches!(stages[1], Stage::Enhance(_)));

        let bare = ProcessingParameters::default();
        assert!(bare.stages().is_empty());
    }
}
