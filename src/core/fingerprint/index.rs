//! Streaming dedup index used by the batch orchestrator.
//!
//! Two operating modes with different complexity/accuracy trade-offs
//! coexist deliberately; callers pick one per run:
//!
//! - [`DedupMode::ExactSet`] is O(1) per file and only catches
//!   bit-identical downsamples. Safe for any batch size.
//! - [`DedupMode::Threshold`] compares each incoming fingerprint against
//!   every previously accepted one, catching lightly-edited
//!   near-duplicates at O(n) per file.

use super::Fingerprint;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Advisory batch-size bound for threshold mode. Above this the O(n^2)
/// total cost starts to dominate a run; the index logs a warning once
/// but keeps working.
pub const THRESHOLD_MODE_SOFT_LIMIT: usize = 2_500;

/// Which dedup strategy a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupMode {
    /// Exact fingerprint-set membership (large-batch path)
    ExactSet,
    /// Hamming distance at or below `max_distance` counts as duplicate
    Threshold { max_distance: u32 },
}

impl DedupMode {
    /// Threshold mode with the default distance of 5 bits of 64
    /// (roughly a 92% similarity floor).
    pub fn default_threshold() -> Self {
        DedupMode::Threshold { max_distance: 5 }
    }
}

/// Fingerprints seen so far in one batch run.
///
/// Owned by the run and passed by reference, never ambient state; a
/// fresh run always starts from an empty index.
pub struct DedupIndex {
    mode: DedupMode,
    exact: HashSet<u64>,
    accepted: Vec<Fingerprint>,
    warned: bool,
}

impl DedupIndex {
    /// Create an empty index for the given mode
    pub fn new(mode: DedupMode) -> Self {
        Self {
            mode,
            exact: HashSet::new(),
            accepted: Vec::new(),
            warned: false,
        }
    }

    /// The mode this index was created with
    pub fn mode(&self) -> DedupMode {
        self.mode
    }

    /// Number of accepted (non-duplicate) fingerprints so far
    pub fn len(&self) -> usize {
        match self.mode {
            DedupMode::ExactSet => self.exact.len(),
            DedupMode::Threshold { .. } => self.accepted.len(),
        }
    }

    /// True when no fingerprint has been accepted yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check an incoming fingerprint and, if it is new, accept it.
    ///
    /// Returns `true` when the fingerprint matches something already
    /// accepted (the file is a duplicate).
    pub fn check_and_insert(&mut self, fingerprint: Fingerprint) -> bool {
        match self.mode {
            DedupMode::ExactSet => !self.exact.insert(fingerprint.bits()),
            DedupMode::Threshold { max_distance } => {
                if !self.warned && self.accepted.len() > THRESHOLD_MODE_SOFT_LIMIT {
                    tracing::warn!(
                        accepted = self.accepted.len(),
                        "threshold dedup past its soft limit; consider exact-set mode"
                    );
                    self.warned = true;
                }

                let duplicate = self
                    .accepted
                    .iter()
                    .any(|seen| seen.distance(&fingerprint) <= max_distance);

                if !duplicate {
                    self.accepted.push(fingerprint);
                }
                duplicate
            }
        }
    }
}
