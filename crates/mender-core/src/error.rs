//! Error types for the core data model.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::span::Span;

/// Errors raised while applying edits or persisting buffers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// An edit span reaches past the end of the buffer.
    #[error("edit span [{}, {}) exceeds buffer length {buffer_len}", span.start, span.end())]
    EditOutOfBounds {
        /// The offending span.
        span: Span,
        /// Length of the buffer the edit was applied to.
        buffer_len: usize,
    },

    /// An edit span endpoint falls inside a UTF-8 character.
    #[error("edit span [{}, {}) is not on a UTF-8 character boundary", span.start, span.end())]
    NonBoundaryEdit {
        /// The offending span.
        span: Span,
    },

    /// The edit list handed to the applier still contains an overlap.
    ///
    /// The merge step removes conflicts before application, so this
    /// indicates a caller bypassing the merge.
    #[error("overlapping edit at [{}, {}) reached the applier", at.start, at.end())]
    OverlappingEdits {
        /// The span that overlapped its predecessor.
        at: Span,
    },

    /// Reading or writing a source file failed.
    #[error("i/o failure on '{path}': {source}")]
    Io {
        /// The file being read or written.
        path: Utf8PathBuf,
        /// The underlying i/o error.
        #[source]
        source: std::io::Error,
    },
}
