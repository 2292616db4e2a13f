//! Diagnostics reported by the analysis service.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::span::Span;

/// Severity classification of a diagnostic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Severity {
    /// The file does not compile.
    Error,
    /// Suspicious but compiling code.
    Warning,
    /// A stylistic or refactoring hint.
    Suggestion,
}

/// A single analysis finding at a specific code location.
///
/// Diagnostics are immutable and identified by `(file, code, span)`. The
/// numeric code is stable across analysis runs; the allow-list of fixable
/// codes is matched against it.
///
/// # Example
///
/// ```
/// use mender_core::{Diagnostic, Severity, Span};
///
/// let diag = Diagnostic::new(
///     2304,
///     "Cannot find name 'X'",
///     "src/app.tsx",
///     Span::new(120, 1),
///     Severity::Error,
/// );
/// assert_eq!(diag.code(), 2304);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    code: u32,
    message: String,
    file: Utf8PathBuf,
    span: Span,
    severity: Severity,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: u32,
        message: impl Into<String>,
        file: impl Into<Utf8PathBuf>,
        span: Span,
        severity: Severity,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            file: file.into(),
            span,
            severity,
        }
    }

    /// Stable numeric classification.
    #[must_use]
    pub const fn code(&self) -> u32 {
        self.code
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// File the finding was reported in.
    #[must_use]
    pub fn file(&self) -> &Utf8Path {
        &self.file
    }

    /// Byte range the finding covers.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Severity classification.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }
}
