//! All-or-nothing admission of cross-file fix candidates.
//!
//! Fix candidates may touch several files. A candidate is admitted only
//! when every one of its edits is compatible with the edits already
//! admitted for the same files; otherwise the whole candidate is dropped
//! and counted as a conflict. Admission happens sequentially during
//! collection, before the parallel per-file phase starts.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};

use mender_core::{Span, TextEdit};

use crate::analysis::FixCandidate;

/// Tracks admitted candidate edits across files.
#[derive(Debug, Default)]
pub struct CandidateLedger {
    admitted: BTreeMap<Utf8PathBuf, Vec<Vec<TextEdit>>>,
    claimed: BTreeMap<Utf8PathBuf, Vec<Span>>,
    rejected: usize,
}

impl CandidateLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries to admit a candidate; returns whether it was accepted.
    ///
    /// Two insertions at the same offset do not conflict, matching the
    /// merge sweep: both will be accepted there and concatenate in
    /// admission order.
    pub fn admit(&mut self, candidate: &FixCandidate) -> bool {
        let compatible = candidate.edits().iter().all(|file_edit| {
            self.claimed
                .get(&file_edit.file)
                .is_none_or(|spans| spans.iter().all(|s| !s.overlaps(&file_edit.edit.span())))
        });
        if !compatible {
            self.rejected += 1;
            return false;
        }

        let mut per_file: BTreeMap<Utf8PathBuf, Vec<TextEdit>> = BTreeMap::new();
        for file_edit in candidate.edits() {
            self.claimed
                .entry(file_edit.file.clone())
                .or_default()
                .push(file_edit.edit.span());
            per_file
                .entry(file_edit.file.clone())
                .or_default()
                .push(file_edit.edit.clone());
        }
        for (file, edits) in per_file {
            self.admitted.entry(file).or_default().push(edits);
        }
        true
    }

    /// Edits admitted for one file, grouped by originating candidate.
    #[must_use]
    pub fn admitted_for(&self, file: &Utf8Path) -> &[Vec<TextEdit>] {
        self.admitted.get(file).map_or(&[], Vec::as_slice)
    }

    /// Number of candidates dropped for overlapping an admitted one.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.rejected
    }
}
