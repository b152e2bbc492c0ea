//! # photo-batch CLI
//!
//! Command-line interface for the batch photo pipeline.
//!
//! ## Usage
//! ```bash
//! photo-batch process ~/Screenshots --out ./cleaned --ratio 16:9
//! photo-batch dedup ~/Photos --threshold 5 --output json
//! ```

mod cli;

use batch_photo_pipeline::Result;

fn main() -> Result<()> {
    cli::run()
}
