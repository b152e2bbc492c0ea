//! Per-unit outcomes and run-level counters.

use crate::core::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};

/// Terminal disposition of one queued unit.
///
/// Every unit ends in exactly one of these states; a unit is never
/// counted twice across dispositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Survived every stage; output bytes were produced
    Processed,
    /// Rejected by the dedup index
    Duplicate,
    /// Rejected by a validation filter (junk, size, format, resolution)
    Deleted,
    /// A decode or encode failure confined to this unit
    Error,
}

/// Outcome of one queued unit.
///
/// Grid splitting turns a single source file into several records, one
/// per region, all sharing the source's unit index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingRecord {
    pub status: RecordStatus,
    /// Human-readable explanation for non-processed dispositions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Output filename stem (before template resolution)
    pub name: String,
    /// 1-based position of the source file in the queue
    pub index: usize,
    /// Source byte size
    pub original_size: u64,
    /// Encoded output byte size (0 unless processed)
    pub new_size: u64,
    /// Encoded output bytes; kept out of serialized reports
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
}

impl ProcessingRecord {
    /// Record for a unit rejected before any pixel work.
    pub fn rejected(
        status: RecordStatus,
        reason: impl Into<String>,
        name: impl Into<String>,
        index: usize,
        original_size: u64,
    ) -> Self {
        Self {
            status,
            reason: Some(reason.into()),
            name: name.into(),
            index,
            original_size,
            new_size: 0,
            output: None,
            fingerprint: None,
        }
    }
}

/// Aggregate counters for one run.
///
/// Two conventions to know:
///
/// - A duplicate increments both `duplicates` and `deleted`, so
///   `deleted` is "units that produced no output for a validation or
///   dedup reason" and the accounting identity is
///   `total == processed + (deleted - duplicates) + duplicates + errors`.
/// - Counters advance once per source file, not once per appended
///   record: a grid-split file counts as `processed` when at least one
///   region encoded, and as an `error` only when every region failed.
///   Per-region outcomes stay visible on the record list. This keeps
///   the identity above closed over `total` source files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Source files queued
    pub total: usize,
    /// Units that produced output
    pub processed: usize,
    /// Units rejected by the dedup index
    pub duplicates: usize,
    /// Units rejected by validation or dedup (superset of `duplicates`)
    pub deleted: usize,
    /// Units that failed to decode or encode
    pub errors: usize,
}

impl Stats {
    /// Fold one terminal disposition into the counters.
    pub fn apply(&mut self, status: RecordStatus) {
        match status {
            RecordStatus::Processed => self.processed += 1,
            RecordStatus::Duplicate => {
                self.duplicates += 1;
                self.deleted += 1;
            }
            RecordStatus::Deleted => self.deleted += 1,
            RecordStatus::Error => self.errors += 1,
        }
    }

    /// Check the accounting identity documented on the type.
    pub fn is_consistent(&self) -> bool {
        self.total == self.processed + (self.deleted - self.duplicates) + self.duplicates + self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_counts_in_both_columns() {
        let mut stats = Stats {
            total: 1,
            ..Default::default()
        };
        stats.apply(RecordStatus::Duplicate);

        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.deleted, 1);
        assert!(stats.is_consistent());
    }

    #[test]
    fn each_disposition_hits_one_terminal_counter() {
        let mut stats = Stats {
            total: 4,
            ..Default::default()
        };
        stats.apply(RecordStatus::Processed);
        stats.apply(RecordStatus::Duplicate);
        stats.apply(RecordStatus::Deleted);
        stats.apply(RecordStatus::Error);

        assert_eq!(stats.processed, 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.deleted, 2);
        assert_eq!(stats.errors, 1);
        assert!(stats.is_consistent());
    }

    #[test]
    fn record_serialization_skips_output_bytes() {
        let record = ProcessingRecord {
            status: RecordStatus::Processed,
            reason: None,
            name: "photo".to_string(),
            index: 1,
            original_size: 1024,
            new_size: 900,
            output: Some(vec![1, 2, 3]),
            fingerprint: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("output"));
        assert!(!json.contains("reason"));
        assert!(json.contains("processed"));
    }
}
