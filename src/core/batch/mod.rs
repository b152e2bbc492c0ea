//! # Batch Module
//!
//! The orchestration layer: captures run parameters, drives every
//! queued source file through validation, dedup, splitting, the pixel
//! stages, and encoding, and reports records, stats, and progress.
//!
//! The loop is single-threaded and step-synchronous; determinism comes
//! from processing files in queue order with an immutable parameter
//! snapshot. Per-unit failures are confined to their unit.

mod naming;
mod params;
mod record;
mod runner;

pub use naming::{export_files, resolve_name, ExportFile};
pub use params::{ProcessingParameters, DEFAULT_NAMING_TEMPLATE};
pub use record::{ProcessingRecord, RecordStatus, Stats};
pub use runner::{BatchOutcome, BatchRunner};
