//! Span-scoped text replacements.

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A single text replacement within one file.
///
/// Replaces the bytes covered by `span` with `new_text`. A zero-length span
/// is a pure insertion; empty replacement text is a deletion.
///
/// # Example
///
/// ```
/// use mender_core::{Span, TextEdit};
///
/// let edit = TextEdit::insert_at(0, "import X from 'x';\n");
/// assert!(edit.span().is_insertion());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    span: Span,
    new_text: String,
}

impl TextEdit {
    /// Builds an edit replacing `span` with `new_text`.
    #[must_use]
    pub fn replace(span: Span, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    /// Creates an insertion at the given byte offset.
    #[must_use]
    pub fn insert_at(offset: usize, new_text: impl Into<String>) -> Self {
        Self::replace(Span::point(offset), new_text)
    }

    /// Creates a deletion covering `span`.
    #[must_use]
    pub fn delete(span: Span) -> Self {
        Self::replace(span, String::new())
    }

    /// The byte range being replaced.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// The replacement text.
    #[must_use]
    pub fn new_text(&self) -> &str {
        &self.new_text
    }
}
