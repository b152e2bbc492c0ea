//! Extension filtering for the enumerator.

use std::collections::HashSet;
use std::path::Path;

/// Raster extensions that are always worth queueing, even when they sit
/// in neither the allowed nor the junk list for a given run.
const ALWAYS_KNOWN: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif", "ico", "tmp",
];

/// Decides which files are queued during enumeration.
pub struct SourceFilter {
    /// Extensions known to the pipeline
    known: HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl SourceFilter {
    /// Build a filter from the run's allowed and junk format lists.
    ///
    /// The known set is the union of both lists with [`ALWAYS_KNOWN`],
    /// so junk files are still enumerated (the orchestrator needs to see
    /// them to record their deletion) while unrelated files never enter
    /// the queue.
    pub fn from_formats(allowed: &[String], junk: &[String]) -> Self {
        let mut known: HashSet<String> = ALWAYS_KNOWN.iter().map(|e| e.to_string()).collect();
        known.extend(allowed.iter().map(|e| e.to_lowercase()));
        known.extend(junk.iter().map(|e| e.to_lowercase()));
        Self {
            known,
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Check if a file should be queued
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.known.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    /// Lowercase extension for a path, empty when absent
    pub fn extension_of(path: &Path) -> String {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default()
    }
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self::from_formats(&[], &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_raster_formats() {
        let filter = SourceFilter::default();
        assert!(filter.should_include(Path::new("/photos/image.jpg")));
        assert!(filter.should_include(Path::new("/photos/image.JPEG")));
        assert!(filter.should_include(Path::new("/photos/image.webp")));
    }

    #[test]
    fn filter_includes_junk_so_it_can_be_deleted() {
        let filter = SourceFilter::from_formats(&[], &["db".to_string()]);
        assert!(filter.should_include(Path::new("/photos/Thumbs.db")));
        assert!(filter.should_include(Path::new("/photos/leftover.tmp")));
    }

    #[test]
    fn filter_excludes_unrelated_files() {
        let filter = SourceFilter::default();
        assert!(!filter.should_include(Path::new("/photos/document.pdf")));
        assert!(!filter.should_include(Path::new("/photos/video.mp4")));
    }

    #[test]
    fn filter_excludes_hidden_by_default() {
        let filter = SourceFilter::default();
        assert!(!filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn filter_can_include_hidden() {
        let filter = SourceFilter::default().with_hidden(true);
        assert!(filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn filter_handles_no_extension() {
        let filter = SourceFilter::default();
        assert!(!filter.should_include(Path::new("/photos/no_extension")));
    }

    #[test]
    fn extension_of_lowercases() {
        assert_eq!(SourceFilter::extension_of(Path::new("/a/B.PNG")), "png");
        assert_eq!(SourceFilter::extension_of(Path::new("/a/noext")), "");
    }
}
