//! # Scanner Module
//!
//! Discovers candidate files beneath a dropped or selected root.
//!
//! The enumerator is deliberately eager about filtering: only extensions
//! "known" to the pipeline (allowed output formats, deletable junk
//! formats, and a small set of always-relevant raster extensions) are
//! queued at all. Everything else is skipped without a record.
//!
//! ## Example
//! ```rust,ignore
//! use batch_photo_pipeline::core::scanner::{SourceScanner, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let sources = scanner.scan(&["/Users/photos".into()])?;
//! ```

mod filter;
mod walker;

pub use filter::SourceFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A discovered candidate file.
///
/// Created during enumeration, immutable, and consumed exactly once by
/// the batch orchestrator. The path acts as the handle to the raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name including extension
    pub name: String,
    /// Lowercase extension without the dot
    pub extension: String,
    /// File size in bytes
    pub size: u64,
    /// Path used to read the raw bytes
    pub path: PathBuf,
}

impl SourceFile {
    /// File name without its extension, used by the `{original}` naming
    /// placeholder.
    pub fn stem(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.name)
    }
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered files in enumeration order
    pub files: Vec<SourceFile>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for source enumerators
///
/// Implement this trait to feed the orchestrator from somewhere other
/// than the filesystem (e.g. in tests).
pub trait SourceScanner: Send + Sync {
    /// Enumerate candidate files under the given roots
    fn scan(&self, roots: &[PathBuf]) -> Result<ScanResult, ScanError>;

    /// Enumerate with progress reporting via events
    fn scan_with_events(
        &self,
        roots: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanResult, ScanError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_extension() {
        let file = SourceFile {
            name: "holiday.photo.jpg".to_string(),
            extension: "jpg".to_string(),
            size: 1024,
            path: PathBuf::from("/photos/holiday.photo.jpg"),
        };
        assert_eq!(file.stem(), "holiday.photo");
    }

    #[test]
    fn stem_without_extension_is_full_name() {
        let file = SourceFile {
            name: "noext".to_string(),
            extension: String::new(),
            size: 0,
            path: PathBuf::from("/photos/noext"),
        };
        assert_eq!(file.stem(), "noext");
    }
}
