//! Ordered edit collections contributed by a single pass.

use crate::edit::TextEdit;

/// The edits one codemod pass proposes for one file.
///
/// Alongside the raw text edits, an edit set tracks *logical units*: a hoist
/// that moves three import declarations emits four text edits (three
/// deletions plus one insertion) but counts as a single unit in the run
/// report. Ungrouped edits count one unit each. Every edit carries the id
/// of the unit it belongs to, so the merge can accept or drop a unit's
/// edits together.
///
/// # Example
///
/// ```
/// use mender_core::{EditSet, Span, TextEdit};
///
/// let mut set = EditSet::new();
/// set.push(TextEdit::insert_at(0, "a"));
/// set.push_group(vec![
///     TextEdit::delete(Span::new(10, 5)),
///     TextEdit::insert_at(20, "b"),
/// ]);
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.units(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSet {
    edits: Vec<TextEdit>,
    unit_ids: Vec<usize>,
    units: usize,
}

impl EditSet {
    /// Creates an empty edit set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            edits: Vec::new(),
            unit_ids: Vec::new(),
            units: 0,
        }
    }

    /// Adds one edit counting as one logical unit.
    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
        self.unit_ids.push(self.units);
        self.units += 1;
    }

    /// Adds several edits counting as a single logical unit.
    ///
    /// Empty groups are ignored.
    pub fn push_group(&mut self, edits: Vec<TextEdit>) {
        if edits.is_empty() {
            return;
        }
        self.unit_ids.extend(std::iter::repeat_n(self.units, edits.len()));
        self.edits.extend(edits);
        self.units += 1;
    }

    /// The proposed edits in contribution order.
    #[must_use]
    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// The logical unit each edit belongs to, parallel to [`Self::edits`].
    ///
    /// Edits added by [`Self::push_group`] share an id.
    #[must_use]
    pub fn unit_ids(&self) -> &[usize] {
        &self.unit_ids
    }

    /// Number of text edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns `true` when the pass proposed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Number of logical units for report accounting.
    #[must_use]
    pub const fn units(&self) -> usize {
        self.units
    }
}

impl FromIterator<TextEdit> for EditSet {
    fn from_iter<I: IntoIterator<Item = TextEdit>>(iter: I) -> Self {
        let edits: Vec<TextEdit> = iter.into_iter().collect();
        let units = edits.len();
        let unit_ids = (0..units).collect();
        Self {
            edits,
            unit_ids,
            units,
        }
    }
}
