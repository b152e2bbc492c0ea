//! Threshold grouping with a keep-best policy.
//!
//! Unlike the streaming [`super::DedupIndex`], grouping sees the whole
//! batch at once, so it can pick the best member of each duplicate
//! cluster instead of whichever file happened to arrive first. The
//! member with the largest original byte size is treated as canonical.

use super::Fingerprint;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// A file with its computed fingerprint, input to grouping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Original byte size (drives the keep-best choice)
    pub size: u64,
    /// Computed fingerprint
    pub fingerprint: Fingerprint,
}

/// A cluster of mutually similar files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Unique identifier for this group
    pub id: Uuid,
    /// All members, canonical first, then by descending size
    pub members: Vec<FingerprintedFile>,
    /// The member recommended to keep (largest byte size)
    pub canonical: PathBuf,
}

impl DuplicateGroup {
    /// Number of redundant copies (excluding the canonical member)
    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    /// Bytes reclaimable by deleting everything but the canonical member
    pub fn reclaimable_bytes(&self) -> u64 {
        self.members
            .iter()
            .filter(|m| m.path != self.canonical)
            .map(|m| m.size)
            .sum()
    }
}

/// Cluster files whose fingerprints are within `max_distance` of a group
/// seed, keep-best policy applied.
///
/// Greedy single-link pass in input order: each unclaimed file seeds a
/// group and claims every later unclaimed file within the threshold.
/// O(n^2) over the batch; intended for accuracy-sensitive batches below
/// [`super::THRESHOLD_MODE_SOFT_LIMIT`].
///
/// Only groups with at least two members are returned.
pub fn group_duplicates(files: &[FingerprintedFile], max_distance: u32) -> Vec<DuplicateGroup> {
    let mut claimed = vec![false; files.len()];
    let mut groups = Vec::new();

    for i in 0..files.len() {
        if claimed[i] {
            continue;
        }

        let mut members = vec![files[i].clone()];
        for j in (i + 1)..files.len() {
            if claimed[j] {
                continue;
            }
            if files[i].fingerprint.distance(&files[j].fingerprint) <= max_distance {
                claimed[j] = true;
                members.push(files[j].clone());
            }
        }

        if members.len() < 2 {
            continue;
        }
        claimed[i] = true;

        members.sort_by(|a, b| b.size.cmp(&a.size));
        let canonical = members[0].path.clone();

        groups.push(DuplicateGroup {
            id: Uuid::new_v4(),
            members,
            canonical,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64, bits: u64) -> FingerprintedFile {
        FingerprintedFile {
            path: PathBuf::from(format!("/photos/{name}")),
            size,
            fingerprint: Fingerprint::from_bits(bits),
        }
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_duplicates(&[], 5).is_empty());
    }

    #[test]
    fn singletons_are_not_reported() {
        let files = vec![file("a.jpg", 10, 0), file("b.jpg", 10, u64::MAX)];
        assert!(group_duplicates(&files, 5).is_empty());
    }

    #[test]
    fn identical_fingerprints_form_one_group() {
        let files = vec![
            file("a.jpg", 10, 0xAA),
            file("b.jpg", 20, 0xAA),
            file("c.jpg", 5, 0xAA),
        ];

        let groups = group_duplicates(&files, 0);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 3);
        assert_eq!(groups[0].duplicate_count(), 2);
    }

    #[test]
    fn largest_member_is_canonical() {
        let files = vec![
            file("small.jpg", 4_000, 0xAA),
            file("large.jpg", 9_000, 0xAA),
        ];

        let groups = group_duplicates(&files, 0);

        assert_eq!(groups[0].canonical, PathBuf::from("/photos/large.jpg"));
        assert_eq!(groups[0].reclaimable_bytes(), 4_000);
    }

    #[test]
    fn threshold_separates_distant_fingerprints() {
        let files = vec![
            file("a.jpg", 10, 0b0000_0000),
            file("b.jpg", 10, 0b0000_0011), // distance 2 from a
            file("c.jpg", 10, 0b1111_1111), // distance 8 from a
        ];

        let groups = group_duplicates(&files, 5);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn claimed_files_do_not_seed_new_groups() {
        let files = vec![
            file("a.jpg", 10, 0b0000),
            file("b.jpg", 10, 0b0001),
            file("c.jpg", 10, 0b0011),
        ];

        // b is within 1 of both a and c; it must be claimed exactly once
        let groups = group_duplicates(&files, 1);
        let member_total: usize = groups.iter().map(|g| g.members.len()).sum();
        assert!(member_total <= 3);
    }
}
