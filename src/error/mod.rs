//! # Error Module
//!
//! Error types for the batch photo pipeline.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-unit isolation** - decode/encode failures become `error`
//!   records at the orchestrator boundary, never run-level failures
//!
//! Validation rejections (junk format, size out of range, disallowed
//! format, duplicate) are *not* errors; they are terminal dispositions
//! carried by [`crate::core::batch::RecordStatus`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum BatchPipelineError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write output {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while enumerating source files.
///
/// These are recovered locally: the offending entry is skipped and
/// traversal of sibling entries continues.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory entry {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors decoding image bytes
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to decode image {name}: {reason}")]
    InvalidImage { name: String, reason: String },

    #[error("Image is empty or zero-sized: {name}")]
    EmptyImage { name: String },

    #[error("Failed to read image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors producing output bytes after a successful decode/transform
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to encode as {format}: {reason}")]
    EncodingFailed { format: String, reason: String },

    #[error("Unsupported output quality {quality} (must be 1-100)")]
    InvalidQuality { quality: u8 },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, BatchPipelineError>;
