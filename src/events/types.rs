//! Event type definitions for progress reporting.

use crate::core::batch::{RecordStatus, Stats};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the batch pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Source enumeration events
    Scan(ScanEvent),
    /// Batch processing events
    Batch(BatchEvent),
}

/// Events during source enumeration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Enumeration has started
    Started { root: PathBuf },
    /// A candidate file was discovered
    FileFound { path: PathBuf },
    /// An entry could not be read; traversal continues
    Error { path: PathBuf, message: String },
    /// Enumeration completed
    Completed { total_files: usize },
}

/// Events during batch processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BatchEvent {
    /// Processing has started
    Started { total: usize },
    /// One queued unit reached a terminal disposition
    Unit(UnitProgress),
    /// Processing completed (possibly with per-unit errors)
    Completed { summary: RunSummary },
    /// The run was cancelled between units
    Cancelled { processed: usize, total: usize },
}

/// Progress after a terminal unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitProgress {
    /// Number of source files fully handled so far
    pub processed: usize,
    /// Total source files queued
    pub total: usize,
    /// Name of the file that just finished
    pub name: String,
    /// Terminal disposition of that file's first-stage record
    pub status: RecordStatus,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Final counters
    pub stats: Stats,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Batch(BatchEvent::Unit(UnitProgress {
            processed: 10,
            total: 50,
            name: "photo.jpg".to_string(),
            status: RecordStatus::Processed,
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Batch(BatchEvent::Unit(p)) => {
                assert_eq!(p.processed, 10);
                assert_eq!(p.status, RecordStatus::Processed);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn run_summary_is_serializable() {
        let summary = RunSummary {
            stats: Stats {
                total: 1000,
                processed: 900,
                duplicates: 40,
                deleted: 90,
                errors: 10,
            },
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("1000"));
    }
}
