//! Aggregated run reporting.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Machine-readable summary of one pipeline run.
///
/// The report is the sole success signal: a file with no applied edits is a
/// legitimate terminal outcome ("nothing to fix" or "fixes conflicted"),
/// not an error. Wire field names match the invocation surface consumed by
/// callers: `{ok, files, edits_total, per_codemod, ...}`.
///
/// # Example
///
/// ```
/// use mender_core::RunReport;
///
/// let mut report = RunReport::new();
/// report.record_file();
/// report.record_pass("hoist-imports", 1);
/// assert_eq!(report.edits_total, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Whether the run completed.
    pub ok: bool,
    /// Number of files processed.
    pub files: usize,
    /// Total logical edits applied across all passes.
    pub edits_total: usize,
    /// Logical edits applied per codemod pass.
    pub per_codemod: BTreeMap<String, usize>,
    /// Edits dropped by the merge because they overlapped a
    /// higher-priority edit. Expected, never surfaced as failure.
    pub conflicts_skipped: usize,
    /// Files skipped after a recoverable per-file failure.
    pub errored_files: Vec<Utf8PathBuf>,
}

impl RunReport {
    /// Creates an empty report for a run in progress.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    /// Counts one processed file.
    pub fn record_file(&mut self) {
        self.files += 1;
    }

    /// Adds applied logical units for a pass.
    ///
    /// Zero-unit contributions are dropped so `per_codemod` only lists
    /// passes that changed something.
    pub fn record_pass(&mut self, pass: &str, units: usize) {
        if units == 0 {
            return;
        }
        *self.per_codemod.entry(pass.to_owned()).or_insert(0) += units;
        self.edits_total += units;
    }

    /// Counts conflicts skipped by the merge.
    pub fn record_conflicts(&mut self, skipped: usize) {
        self.conflicts_skipped += skipped;
    }

    /// Marks a file as skipped after a recoverable failure.
    pub fn record_errored_file(&mut self, path: Utf8PathBuf) {
        self.errored_files.push(path);
    }

    /// Folds another report into this one (per-file aggregation).
    pub fn absorb(&mut self, other: Self) {
        self.files += other.files;
        self.edits_total += other.edits_total;
        self.conflicts_skipped += other.conflicts_skipped;
        for (pass, units) in other.per_codemod {
            *self.per_codemod.entry(pass).or_insert(0) += units;
        }
        self.errored_files.extend(other.errored_files);
        self.ok = self.ok && other.ok;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_pass_ignores_zero_units() {
        let mut report = RunReport::new();
        report.record_pass("prefix-unused", 0);
        assert!(report.per_codemod.is_empty());
        assert_eq!(report.edits_total, 0);
    }

    #[test]
    fn absorb_sums_counters_and_passes() {
        let mut left = RunReport::new();
        left.record_file();
        left.record_pass("hoist-imports", 1);

        let mut right = RunReport::new();
        right.record_file();
        right.record_pass("hoist-imports", 2);
        right.record_pass("prefix-unused", 3);
        right.record_conflicts(1);

        left.absorb(right);

        assert_eq!(left.files, 2);
        assert_eq!(left.edits_total, 6);
        assert_eq!(left.per_codemod.get("hoist-imports"), Some(&3));
        assert_eq!(left.conflicts_skipped, 1);
        assert!(left.ok);
    }

    #[test]
    fn report_serialises_wire_field_names() {
        let mut report = RunReport::new();
        report.record_file();
        report.record_pass("normalise-import-paths", 2);

        let json = serde_json::to_value(&report).expect("serialise");
        assert_eq!(json["ok"], true);
        assert_eq!(json["files"], 1);
        assert_eq!(json["edits_total"], 2);
        assert_eq!(json["per_codemod"]["normalise-import-paths"], 2);
    }
}
