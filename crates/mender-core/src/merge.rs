//! Deterministic merge of per-pass edit sets into one conflict-free set.

use std::collections::BTreeSet;

use crate::edit::TextEdit;
use crate::edit_set::EditSet;

/// Result of merging several pass contributions for one file.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    accepted: Vec<TextEdit>,
    accepted_by_pass: Vec<usize>,
    accepted_units_by_pass: Vec<usize>,
    skipped_conflicts: usize,
}

impl MergeOutcome {
    /// The accepted edits, sorted ascending with non-overlapping spans.
    #[must_use]
    pub fn accepted(&self) -> &[TextEdit] {
        &self.accepted
    }

    /// Accepted text-edit counts indexed like the merge input.
    #[must_use]
    pub fn accepted_by_pass(&self) -> &[usize] {
        &self.accepted_by_pass
    }

    /// Fully accepted logical-unit counts indexed like the merge input.
    ///
    /// This is the figure the run report records: a unit whose edits were
    /// dropped contributes nothing here.
    #[must_use]
    pub fn accepted_units_by_pass(&self) -> &[usize] {
        &self.accepted_units_by_pass
    }

    /// Number of logical units dropped because one of their edits
    /// overlapped a higher-priority edit. Conflicts are expected outcomes,
    /// not errors.
    #[must_use]
    pub const fn skipped_conflicts(&self) -> usize {
        self.skipped_conflicts
    }

    /// Consumes the outcome and returns the accepted edits.
    #[must_use]
    pub fn into_accepted(self) -> Vec<TextEdit> {
        self.accepted
    }
}

/// Merges edit sets contributed by passes in declared priority order.
///
/// All candidate edits are sorted by span start, ties broken by the
/// contributing pass's position in `sets` and then by contribution order
/// within the pass. A greedy left-to-right sweep accepts an edit only when
/// its span starts at or after the end of the last accepted span. The sweep
/// is deterministic for a fixed pass order, and zero-length insertions at a
/// shared offset are all accepted, concatenating in pass order.
///
/// Logical units apply all-or-nothing: when any edit of a unit loses the
/// sweep, the unit's other edits are withdrawn too, even if the sweep had
/// room for them. A hoist whose deletion collides with a diagnostic fix
/// must not leave its paired insertion behind, or the moved text would be
/// duplicated. Each dropped unit counts as one skipped conflict.
///
/// # Example
///
/// ```
/// use mender_core::{EditSet, Span, TextEdit, merge};
///
/// let winner: EditSet = vec![TextEdit::replace(Span::new(0, 4), "a")]
///     .into_iter()
///     .collect();
/// let loser: EditSet = vec![TextEdit::replace(Span::new(2, 4), "b")]
///     .into_iter()
///     .collect();
/// let outcome = merge(&[winner, loser]);
/// assert_eq!(outcome.accepted().len(), 1);
/// assert_eq!(outcome.skipped_conflicts(), 1);
/// ```
#[must_use]
pub fn merge(sets: &[EditSet]) -> MergeOutcome {
    struct Candidate<'a> {
        pass: usize,
        unit: usize,
        index: usize,
        edit: &'a TextEdit,
    }

    let mut candidates: Vec<Candidate<'_>> = Vec::new();
    for (pass, set) in sets.iter().enumerate() {
        let edits = set.edits().iter().zip(set.unit_ids());
        for (index, (edit, unit)) in edits.enumerate() {
            candidates.push(Candidate {
                pass,
                unit: *unit,
                index,
                edit,
            });
        }
    }

    candidates.sort_by(|a, b| {
        a.edit
            .span()
            .start
            .cmp(&b.edit.span().start)
            .then_with(|| a.pass.cmp(&b.pass))
            .then_with(|| a.index.cmp(&b.index))
    });

    // Sweep once, noting every unit that lost an edit.
    let mut dropped_units: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut survivors: Vec<&Candidate<'_>> = Vec::with_capacity(candidates.len());
    let mut last_end = 0usize;
    for candidate in &candidates {
        if candidate.edit.span().start < last_end {
            dropped_units.insert((candidate.pass, candidate.unit));
            continue;
        }
        last_end = last_end.max(candidate.edit.span().end());
        survivors.push(candidate);
    }

    // Withdraw the surviving edits of any unit that lost one; filtering a
    // sorted non-overlapping list keeps it sorted and non-overlapping.
    let mut outcome = MergeOutcome {
        accepted: Vec::with_capacity(survivors.len()),
        accepted_by_pass: vec![0; sets.len()],
        accepted_units_by_pass: vec![0; sets.len()],
        skipped_conflicts: dropped_units.len(),
    };
    let mut counted_units: BTreeSet<(usize, usize)> = BTreeSet::new();
    for candidate in survivors {
        if dropped_units.contains(&(candidate.pass, candidate.unit)) {
            continue;
        }
        if let Some(count) = outcome.accepted_by_pass.get_mut(candidate.pass) {
            *count += 1;
        }
        if counted_units.insert((candidate.pass, candidate.unit))
            && let Some(count) = outcome.accepted_units_by_pass.get_mut(candidate.pass)
        {
            *count += 1;
        }
        outcome.accepted.push(candidate.edit.clone());
    }

    outcome
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::apply::apply_edits;
    use crate::span::Span;

    fn set_of(edits: Vec<TextEdit>) -> EditSet {
        edits.into_iter().collect()
    }

    #[test]
    fn earlier_pass_wins_overlap() {
        let first = set_of(vec![TextEdit::replace(Span::new(5, 5), "A")]);
        let second = set_of(vec![TextEdit::replace(Span::new(7, 5), "B")]);

        let outcome = merge(&[first, second]);

        assert_eq!(outcome.accepted().len(), 1);
        assert_eq!(outcome.accepted()[0].new_text(), "A");
        assert_eq!(outcome.accepted_by_pass(), &[1, 0]);
        assert_eq!(outcome.skipped_conflicts(), 1);
    }

    #[test]
    fn partially_conflicting_group_is_withdrawn_whole() {
        let source = "const x = 1;\nimport A from 'a';\n";
        let mut fixes = EditSet::new();
        fixes.push(TextEdit::replace(Span::new(13, 19), "import A from 'b';\n"));
        let mut hoist = EditSet::new();
        hoist.push_group(vec![
            TextEdit::insert_at(0, "import A from 'a';\n"),
            TextEdit::delete(Span::new(13, 19)),
        ]);

        let outcome = merge(&[fixes, hoist]);

        // The fix wins the deletion's range; the hoist's insertion must go
        // with it or the import would appear twice.
        assert_eq!(outcome.accepted().len(), 1);
        assert_eq!(outcome.accepted()[0].span(), Span::new(13, 19));
        assert_eq!(outcome.accepted_units_by_pass(), &[1, 0]);
        assert_eq!(outcome.skipped_conflicts(), 1);

        let applied = apply_edits(source, outcome.accepted()).expect("apply");
        assert_eq!(applied.content().matches("import A").count(), 1);
    }

    #[test]
    fn units_with_a_dropped_edit_are_not_counted() {
        let winner = set_of(vec![TextEdit::replace(Span::new(5, 5), "W")]);
        let mut pass = EditSet::new();
        pass.push(TextEdit::replace(Span::new(0, 2), "a"));
        pass.push(TextEdit::replace(Span::new(7, 2), "b"));

        let outcome = merge(&[winner, pass]);

        assert_eq!(outcome.accepted().len(), 2);
        assert_eq!(outcome.accepted_by_pass(), &[1, 1]);
        assert_eq!(outcome.accepted_units_by_pass(), &[1, 1]);
        assert_eq!(outcome.skipped_conflicts(), 1);
    }

    #[test]
    fn merge_is_deterministic_under_repetition() {
        let first = set_of(vec![TextEdit::replace(Span::new(0, 10), "keep")]);
        let second = set_of(vec![TextEdit::replace(Span::new(3, 2), "drop")]);

        let once = merge(&[first.clone(), second.clone()]);
        let twice = merge(&[first, second]);

        assert_eq!(once.accepted(), twice.accepted());
        assert_eq!(once.skipped_conflicts(), twice.skipped_conflicts());
    }

    #[test]
    fn insertions_at_same_offset_all_accepted_in_pass_order() {
        let first = set_of(vec![TextEdit::insert_at(4, "one")]);
        let second = set_of(vec![TextEdit::insert_at(4, "two")]);

        let outcome = merge(&[first, second]);

        assert_eq!(outcome.accepted().len(), 2);
        assert_eq!(outcome.accepted()[0].new_text(), "one");
        assert_eq!(outcome.accepted()[1].new_text(), "two");
        assert_eq!(outcome.skipped_conflicts(), 0);
    }

    #[test]
    fn insertion_inside_replacement_is_a_conflict() {
        let replace = set_of(vec![TextEdit::replace(Span::new(2, 6), "R")]);
        let insert = set_of(vec![TextEdit::insert_at(4, "I")]);

        let outcome = merge(&[replace, insert]);

        assert_eq!(outcome.accepted().len(), 1);
        assert_eq!(outcome.skipped_conflicts(), 1);
    }

    #[rstest]
    #[case(0)]
    #[case(8)]
    fn insertion_at_replacement_boundary_is_accepted(#[case] offset: usize) {
        let replace = set_of(vec![TextEdit::replace(Span::new(2, 6), "R")]);
        let insert = set_of(vec![TextEdit::insert_at(offset, "I")]);

        let outcome = merge(&[replace, insert]);

        assert_eq!(outcome.accepted().len(), 2);
        assert_eq!(outcome.skipped_conflicts(), 0);
    }

    #[test]
    fn empty_input_produces_empty_outcome() {
        let outcome = merge(&[]);
        assert!(outcome.accepted().is_empty());
        assert_eq!(outcome.skipped_conflicts(), 0);
    }
}
