//! Versioned in-memory views of source files.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::apply::apply_edits;
use crate::edit::TextEdit;
use crate::error::CoreError;

/// An in-memory, versioned view of one file's text content.
///
/// A buffer is owned exclusively by the orchestrator for the duration of a
/// run. It is mutated at most once per run — all merged edits for the file
/// are applied in a single step — and persisted only when that step changed
/// anything; untouched files are never rewritten on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    path: Utf8PathBuf,
    content: String,
    version: u32,
    dirty: bool,
}

impl SourceBuffer {
    /// Reads a buffer from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] when the file cannot be read.
    pub fn from_disk(path: impl Into<Utf8PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|source| CoreError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            content,
            version: 1,
            dirty: false,
        })
    }

    /// Creates a buffer from already-loaded content (editor boundary and
    /// tests).
    #[must_use]
    pub fn from_content(path: impl Into<Utf8PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            version: 1,
            dirty: false,
        }
    }

    /// The file this buffer mirrors.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Current text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Monotonic content version, bumped by each successful apply.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns `true` when the buffer diverged from its on-disk content.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Applies a merged, conflict-free edit list and bumps the version.
    ///
    /// Returns the number of edits applied. Applying an empty list leaves
    /// the buffer untouched.
    ///
    /// # Errors
    ///
    /// Propagates [`CoreError`] from [`apply_edits`]; the buffer is left
    /// unchanged on failure.
    pub fn apply(&mut self, edits: &[TextEdit]) -> Result<usize, CoreError> {
        if edits.is_empty() {
            return Ok(0);
        }
        let applied = apply_edits(&self.content, edits)?;
        let count = applied.applied();
        self.content = applied.into_content();
        self.version += 1;
        self.dirty = true;
        Ok(count)
    }

    /// Writes the buffer back to disk when it changed this run.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] when the write fails.
    pub fn persist(&mut self) -> Result<(), CoreError> {
        if !self.dirty {
            return Ok(());
        }
        fs::write(&self.path, &self.content).map_err(|source| CoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }
}
