//! # Batch Photo Pipeline
//!
//! A batch processing pipeline for large, messy folders of images:
//! find everything, drop duplicates and junk, split multi-image sheets,
//! then crop, enhance, and re-encode what remains.
//!
//! ## Core Philosophy
//! - **Never touch sources** - Source files are read-only input;
//!   processed output goes to new files chosen by the caller
//! - **One bad file never sinks the batch** - Per-file failures become
//!   error records and the run keeps going
//! - **Deterministic** - Same files plus same parameters means
//!   byte-identical output and identical stats
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and a thin CLI:
//! - `core` - Scanning, fingerprinting, grid splitting, transforms,
//!   and the batch orchestrator
//! - `events` - Event-driven progress reporting
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{BatchPipelineError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
