//! Core pipeline functionality.
//!
//! Layered bottom-up: `scanner` finds source files, `fingerprint`
//! rejects duplicates, `grid` splits multi-image sheets, `transform`
//! does per-image pixel work, and `batch` orchestrates all of it.

pub mod batch;
pub mod codec;
pub mod fingerprint;
pub mod grid;
pub mod scanner;
pub mod transform;

pub use codec::{ImageCodec, RasterCodec};
