//! Directory walking implementation using walkdir.
//!
//! walkdir re-queries each directory until exhaustion, so bounded
//! directory-listing pages never drop entries; the walk stops only when
//! a directory is truly exhausted.

use super::{filter::SourceFilter, ScanResult, SourceFile, SourceScanner};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Allowed output formats for this run
    pub allowed_formats: Vec<String>,
    /// Junk formats for this run
    pub junk_formats: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: false,
            max_depth: None,
            allowed_formats: Vec::new(),
            junk_formats: Vec::new(),
        }
    }
}

/// Enumerator implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: SourceFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = SourceFilter::from_formats(&config.allowed_formats, &config.junk_formats)
            .with_hidden(config.include_hidden);
        Self { config, filter }
    }

    /// Enumerate one root (a single file or a directory tree)
    fn scan_root(
        &self,
        root: &PathBuf,
        events: Option<&EventSender>,
    ) -> Result<(Vec<SourceFile>, Vec<ScanError>), ScanError> {
        if !root.exists() {
            return Err(ScanError::DirectoryNotFound { path: root.clone() });
        }

        let mut files = Vec::new();
        let mut errors = Vec::new();

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    let path = entry.path();

                    if path.is_dir() {
                        // Skip hidden directories unless configured otherwise
                        if !self.config.include_hidden {
                            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                                if name.starts_with('.') && path != root.as_path() {
                                    continue;
                                }
                            }
                        }
                        continue;
                    }

                    if !self.filter.should_include(path) {
                        continue;
                    }

                    match fs::metadata(path) {
                        Ok(metadata) => {
                            let file = SourceFile {
                                name: path
                                    .file_name()
                                    .map(|n| n.to_string_lossy().into_owned())
                                    .unwrap_or_default(),
                                extension: SourceFilter::extension_of(path),
                                size: metadata.len(),
                                path: path.to_path_buf(),
                            };

                            if let Some(sender) = events {
                                sender.send(Event::Scan(ScanEvent::FileFound {
                                    path: file.path.clone(),
                                }));
                            }

                            files.push(file);
                        }
                        Err(e) => {
                            let error = ScanError::ReadEntry {
                                path: path.to_path_buf(),
                                source: e,
                            };

                            if let Some(sender) = events {
                                sender.send(Event::Scan(ScanEvent::Error {
                                    path: path.to_path_buf(),
                                    message: error.to_string(),
                                }));
                            }

                            errors.push(error);
                        }
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadEntry {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    if let Some(sender) = events {
                        sender.send(Event::Scan(ScanEvent::Error {
                            path,
                            message: error.to_string(),
                        }));
                    }

                    errors.push(error);
                }
            }
        }

        Ok((files, errors))
    }
}

impl SourceScanner for WalkDirScanner {
    fn scan(&self, roots: &[PathBuf]) -> Result<ScanResult, ScanError> {
        self.scan_with_events(roots, &null_sender())
    }

    fn scan_with_events(
        &self,
        roots: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        let mut all_files = Vec::new();
        let mut all_errors = Vec::new();

        for root in roots {
            events.send(Event::Scan(ScanEvent::Started { root: root.clone() }));

            match self.scan_root(root, Some(events)) {
                Ok((files, errors)) => {
                    all_files.extend(files);
                    all_errors.extend(errors);
                }
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "scan root failed");
                    all_errors.push(e);
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: all_files.len(),
        }));

        Ok(ScanResult {
            files: all_files,
            errors: all_errors,
        })
    }
}
