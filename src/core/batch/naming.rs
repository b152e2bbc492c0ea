//! Output filename resolution.

use crate::core::batch::{ProcessingParameters, ProcessingRecord, RecordStatus};
use chrono::NaiveDate;
use std::collections::HashSet;

/// One file ready to be written by the caller.
///
/// The core never touches the output directory; writing and archiving
/// are the consumer's job.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Expand a naming template for one record.
///
/// Placeholders: `{index}` (1-based unit index), `{original}` (source
/// stem, plus any region suffix), `{date}` (YYYYMMDD), `{hash}` (hex
/// fingerprint, empty when no fingerprint was computed).
pub fn resolve_name(template: &str, record: &ProcessingRecord, date: NaiveDate) -> String {
    let hash = record
        .fingerprint
        .map(|f| f.to_hex())
        .unwrap_or_default();

    template
        .replace("{index}", &record.index.to_string())
        .replace("{original}", &record.name)
        .replace("{date}", &date.format("%Y%m%d").to_string())
        .replace("{hash}", &hash)
}

/// Resolve filenames for every processed record, in queue order.
///
/// Records that produced no output are skipped. Filename collisions
/// (possible when the template omits `{original}`) get a numeric
/// suffix so no export silently overwrites another.
pub fn export_files(
    records: &[ProcessingRecord],
    params: &ProcessingParameters,
    date: NaiveDate,
) -> Vec<ExportFile> {
    let extension = params.output_format.extension();
    let mut seen = HashSet::new();
    let mut exports = Vec::new();

    let mut ordered: Vec<&ProcessingRecord> = records
        .iter()
        .filter(|r| r.status == RecordStatus::Processed && r.output.is_some())
        .collect();
    ordered.sort_by_key(|r| r.index);

    for record in ordered {
        let stem = resolve_name(&params.naming_template, record, date);
        let mut filename = format!("{stem}.{extension}");
        let mut counter = 1;
        while !seen.insert(filename.clone()) {
            filename = format!("{stem}_{counter}.{extension}");
            counter += 1;
        }

        exports.push(ExportFile {
            filename,
            bytes: record.output.clone().unwrap_or_default(),
        });
    }

    exports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::Fingerprint;

    fn record(index: usize, name: &str) -> ProcessingRecord {
        ProcessingRecord {
            status: RecordStatus::Processed,
            reason: None,
            name: name.to_string(),
            index,
            original_size: 100,
            new_size: 50,
            output: Some(vec![0u8; 4]),
            fingerprint: Some(Fingerprint::from_bits(0xdead_beef_0000_0000)),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn all_placeholders_expand() {
        let r = record(3, "vacation");
        let name = resolve_name("{index}_{original}_{date}_{hash}", &r, date());
        assert_eq!(name, "3_vacation_20260830_deadbeef00000000");
    }

    #[test]
    fn template_without_placeholders_is_literal() {
        let r = record(1, "x");
        assert_eq!(resolve_name("plain", &r, date()), "plain");
    }

    #[test]
    fn exports_keep_queue_order_and_skip_non_processed() {
        let params = ProcessingParameters {
            naming_template: "out_{index}_{original}".to_string(),
            ..Default::default()
        };

        let mut rejected = record(2, "skipped");
        rejected.status = RecordStatus::Deleted;
        rejected.output = None;

        let records = vec![record(3, "c"), rejected, record(1, "a")];
        let exports = export_files(&records, &params, date());

        assert_eq!(exports.len(), 2);
        assert_eq!(exports[0].filename, "out_1_a.jpg");
        assert_eq!(exports[1].filename, "out_3_c.jpg");
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let params = ProcessingParameters {
            naming_template: "same".to_string(),
            ..Default::default()
        };

        let records = vec![record(1, "a"), record(2, "b"), record(3, "c")];
        let exports = export_files(&records, &params, date());

        let names: Vec<_> = exports.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, ["same.jpg", "same_1.jpg", "same_2.jpg"]);
    }

    #[test]
    fn extension_follows_output_format() {
        let params = ProcessingParameters {
            output_format: crate::core::transform::OutputFormat::Png,
            ..Default::default()
        };
        let exports = export_files(&[record(1, "a")], &params, date());
        assert!(exports[0].filename.ends_with(".png"));
    }
}
