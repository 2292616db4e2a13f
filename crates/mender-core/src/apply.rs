//! Pure, drift-free application of a conflict-free edit set.

use crate::edit::TextEdit;
use crate::error::CoreError;

/// Result of applying edits to buffer content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    content: String,
    applied: usize,
}

impl Applied {
    /// The rewritten content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of edits applied.
    #[must_use]
    pub const fn applied(&self) -> usize {
        self.applied
    }

    /// Consumes the result and returns the rewritten content.
    #[must_use]
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Applies a merged edit set to `content`, producing new content.
///
/// Expects edits sorted ascending by span start with non-overlapping spans,
/// as produced by [`merge`](crate::merge). Edits are applied right-to-left
/// (descending by start) so that earlier offsets remain valid while later
/// text shifts; this is what keeps the operation drift-free. The function is
/// pure; persistence is a separate step.
///
/// # Errors
///
/// Returns [`CoreError::EditOutOfBounds`] when a span reaches past the end
/// of the buffer, [`CoreError::NonBoundaryEdit`] when a span endpoint falls
/// inside a UTF-8 character, and [`CoreError::OverlappingEdits`] when the
/// input violates the merge invariant.
pub fn apply_edits(content: &str, edits: &[TextEdit]) -> Result<Applied, CoreError> {
    let mut last_end = 0usize;
    for edit in edits {
        let span = edit.span();
        if span.start < last_end {
            return Err(CoreError::OverlappingEdits { at: span });
        }
        if span.end() > content.len() {
            return Err(CoreError::EditOutOfBounds {
                span,
                buffer_len: content.len(),
            });
        }
        if !content.is_char_boundary(span.start) || !content.is_char_boundary(span.end()) {
            return Err(CoreError::NonBoundaryEdit { span });
        }
        last_end = last_end.max(span.end());
    }

    let mut result = content.to_owned();
    // Reverse iteration applies the right-most edit first and keeps tied
    // insertions in contribution order.
    for edit in edits.iter().rev() {
        let span = edit.span();
        result.replace_range(span.start..span.end(), edit.new_text());
    }

    Ok(Applied {
        content: result,
        applied: edits.len(),
    })
}
