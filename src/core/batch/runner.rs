//! The batch orchestrator.
//!
//! Drives every queued source file through validation, dedup, grid
//! splitting, the pixel stages, and encoding. Failures never cross a
//! unit boundary: a file that cannot be read, decoded, or encoded
//! becomes an error record and the run moves on.

use crate::core::batch::{ProcessingParameters, ProcessingRecord, RecordStatus, Stats};
use crate::core::codec::{ImageCodec, RasterCodec};
use crate::core::fingerprint::{DedupIndex, Fingerprint};
use crate::core::grid::{GridDetector, GridMode};
use crate::core::scanner::SourceFile;
use crate::core::transform::apply_stages;
use crate::error::BatchPipelineError;
use crate::events::{null_sender, BatchEvent, Event, EventSender, RunSummary, UnitProgress};
use image::RgbaImage;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Result of a completed (or cancelled) run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// Run identifier
    pub id: Uuid,
    /// One record per terminal unit, plus one per grid region
    pub records: Vec<ProcessingRecord>,
    pub stats: Stats,
    pub duration_ms: u64,
    /// True when the run stopped early at a unit boundary
    pub cancelled: bool,
}

/// Orchestrator for one batch configuration.
///
/// Construct with [`BatchRunner::new`], then call [`run`] per queue.
/// The runner itself is immutable; all per-run state lives inside
/// `run`, so one runner can serve several queues.
///
/// [`run`]: BatchRunner::run
pub struct BatchRunner {
    params: ProcessingParameters,
    codec: Box<dyn RasterCodec>,
    cancel: Arc<AtomicBool>,
}

impl BatchRunner {
    /// Validate the parameters and build a runner with the default
    /// codec.
    pub fn new(params: ProcessingParameters) -> Result<Self, BatchPipelineError> {
        params.validate()?;
        Ok(Self {
            params,
            codec: Box::new(ImageCodec),
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Substitute the raster codec (tests inject deterministic fakes).
    pub fn with_codec(mut self, codec: Box<dyn RasterCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Handle for requesting cancellation from another thread. The run
    /// stops at the next unit boundary; work on the current unit
    /// finishes first.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Process the queue without progress events.
    pub fn run(&self, files: &[SourceFile]) -> BatchOutcome {
        self.run_with_events(files, &null_sender())
    }

    /// Process the queue, emitting a [`BatchEvent`] stream.
    pub fn run_with_events(&self, files: &[SourceFile], events: &EventSender) -> BatchOutcome {
        let started = Instant::now();
        let total = files.len();
        let mut stats = Stats {
            total,
            ..Default::default()
        };
        let mut records = Vec::with_capacity(total);
        let mut dedup = self.params.dedup.map(DedupIndex::new);
        let mut cancelled = false;

        events.send(Event::Batch(BatchEvent::Started { total }));

        for (position, file) in files.iter().enumerate() {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::warn!(processed = position, total, "run cancelled");
                events.send(Event::Batch(BatchEvent::Cancelled {
                    processed: position,
                    total,
                }));
                cancelled = true;
                break;
            }

            let index = position + 1;
            let unit_status = self.process_unit(file, index, dedup.as_mut(), &mut records);
            stats.apply(unit_status);

            events.send(Event::Batch(BatchEvent::Unit(UnitProgress {
                processed: index,
                total,
                name: file.name.clone(),
                status: unit_status,
            })));
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        if !cancelled {
            events.send(Event::Batch(BatchEvent::Completed {
                summary: RunSummary { stats, duration_ms },
            }));
        }

        BatchOutcome {
            id: Uuid::new_v4(),
            records,
            stats,
            duration_ms,
            cancelled,
        }
    }

    /// Run one unit to a terminal disposition, appending its records.
    ///
    /// Returns the unit-level status used for stats and progress; a
    /// split unit counts as processed when at least one region made it
    /// through.
    fn process_unit(
        &self,
        file: &SourceFile,
        index: usize,
        dedup: Option<&mut DedupIndex>,
        records: &mut Vec<ProcessingRecord>,
    ) -> RecordStatus {
        let params = &self.params;

        if params.delete_junk && params.junk_formats.iter().any(|f| f == &file.extension) {
            tracing::debug!(name = %file.name, "rejected: junk extension");
            records.push(ProcessingRecord::rejected(
                RecordStatus::Deleted,
                format!("junk extension .{}", file.extension),
                file.stem(),
                index,
                file.size,
            ));
            return RecordStatus::Deleted;
        }

        if !params.size_in_range(file.size) {
            records.push(ProcessingRecord::rejected(
                RecordStatus::Deleted,
                format!("size {} bytes outside configured range", file.size),
                file.stem(),
                index,
                file.size,
            ));
            return RecordStatus::Deleted;
        }

        if !params.allowed_formats.is_empty()
            && !params.allowed_formats.iter().any(|f| f == &file.extension)
        {
            records.push(ProcessingRecord::rejected(
                RecordStatus::Deleted,
                format!("format .{} not in allowed list", file.extension),
                file.stem(),
                index,
                file.size,
            ));
            return RecordStatus::Deleted;
        }

        let bytes = match std::fs::read(&file.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                records.push(ProcessingRecord::rejected(
                    RecordStatus::Error,
                    format!("read failed: {e}"),
                    file.stem(),
                    index,
                    file.size,
                ));
                return RecordStatus::Error;
            }
        };

        let image = match self.codec.decode(&bytes, &file.name) {
            Ok(image) => image,
            Err(e) => {
                tracing::debug!(name = %file.name, error = %e, "decode failed");
                records.push(ProcessingRecord::rejected(
                    RecordStatus::Error,
                    e.to_string(),
                    file.stem(),
                    index,
                    file.size,
                ));
                return RecordStatus::Error;
            }
        };

        let fingerprint = Fingerprint::from_image(&image);
        if let Some(dedup) = dedup {
            if dedup.check_and_insert(fingerprint) {
                tracing::debug!(name = %file.name, hash = %fingerprint, "rejected: duplicate");
                let mut record = ProcessingRecord::rejected(
                    RecordStatus::Duplicate,
                    "duplicate of an earlier file",
                    file.stem(),
                    index,
                    file.size,
                );
                record.fingerprint = Some(fingerprint);
                records.push(record);
                return RecordStatus::Duplicate;
            }
        }

        if !params.resolution_in_range(image.width()) {
            records.push(ProcessingRecord::rejected(
                RecordStatus::Deleted,
                format!("width {} outside configured range", image.width()),
                file.stem(),
                index,
                file.size,
            ));
            return RecordStatus::Deleted;
        }

        let units = self.split_unit(file, image);

        let mut any_processed = false;
        let mut any_error = false;
        for (name, region_image) in units {
            match self.finish_unit(&name, index, file.size, fingerprint, region_image) {
                Ok(record) => {
                    any_processed = true;
                    records.push(record);
                }
                Err(record) => {
                    any_error = true;
                    records.push(record);
                }
            }
        }

        if any_processed {
            RecordStatus::Processed
        } else if any_error {
            RecordStatus::Error
        } else {
            // Unreachable with current split modes; kept for the
            // accounting identity
            RecordStatus::Deleted
        }
    }

    /// Expand one decoded image into independently-processed regions.
    fn split_unit(&self, file: &SourceFile, image: RgbaImage) -> Vec<(String, RgbaImage)> {
        let stem = file.stem().to_string();

        match self.params.grid {
            GridMode::Off => vec![(stem, image)],
            GridMode::Auto { sensitivity } => {
                let detector = GridDetector::new(sensitivity);
                match detector.split(&image) {
                    Some(regions) => {
                        tracing::debug!(name = %file.name, regions = regions.len(), "auto split");
                        regions
                            .into_iter()
                            .enumerate()
                            .map(|(i, (_, img))| (format!("{stem}_split_{}", i + 1), img))
                            .collect()
                    }
                    None => vec![(stem, image)],
                }
            }
            GridMode::Fixed { rows, cols } => {
                if rows <= 1 && cols <= 1 {
                    return vec![(stem, image)];
                }
                let cells = crate::core::grid::split_fixed(&image, rows, cols);
                if cells.is_empty() {
                    // Image too small for the requested grid
                    return vec![(stem, image)];
                }
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(i, (_, img))| (format!("{stem}_cell_{}", i + 1), img))
                    .collect()
            }
        }
    }

    /// Apply the pixel stages and encode one region.
    fn finish_unit(
        &self,
        name: &str,
        index: usize,
        original_size: u64,
        fingerprint: Fingerprint,
        image: RgbaImage,
    ) -> Result<ProcessingRecord, ProcessingRecord> {
        let staged = apply_stages(image, &self.params.stages());

        match self
            .codec
            .encode(&staged, self.params.output_format, self.params.quality)
        {
            Ok(output) => Ok(ProcessingRecord {
                status: RecordStatus::Processed,
                reason: None,
                name: name.to_string(),
                index,
                original_size,
                new_size: output.len() as u64,
                output: Some(output),
                fingerprint: Some(fingerprint),
            }),
            Err(e) => Err(ProcessingRecord::rejected(
                RecordStatus::Error,
                e.to_string(),
                name,
                index,
                original_size,
            )),
        }
    }
}
