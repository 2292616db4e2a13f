//! The analysis-service seam.
//!
//! Diagnostics and fix candidates come from an external analysis session.
//! The engine talks to it through [`AnalysisService`] so production runs,
//! the built-in syntax checker, and scripted test doubles are
//! interchangeable. Everything the engine acts on is filtered through an
//! allow-list of diagnostic codes first.

use std::collections::{BTreeMap, BTreeSet};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use mender_core::{Diagnostic, Severity, Span, TextEdit};
use mender_syntax::{Language, parse_source};

use crate::error::EngineError;

/// Diagnostic code reported for files the parser cannot fully parse.
pub const SYNTAX_ERROR_CODE: u32 = 1005;

const DEFAULT_ALLOWED_CODES: [u32; 6] = [2304, 2307, 2322, 2345, 2551, 2552];

/// The set of diagnostic codes a run may act on.
///
/// Diagnostics with codes outside the list are still reported but never
/// fixed. The default covers unresolved names, unresolved modules,
/// assignability mismatches, and misspelt-member suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList {
    codes: BTreeSet<u32>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            codes: DEFAULT_ALLOWED_CODES.into_iter().collect(),
        }
    }
}

impl AllowList {
    /// Builds an allow-list from explicit codes.
    #[must_use]
    pub fn new(codes: impl IntoIterator<Item = u32>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    /// Whether the run may act on diagnostics with this code.
    #[must_use]
    pub fn permits(&self, code: u32) -> bool {
        self.codes.contains(&code)
    }
}

/// One edit belonging to a fix candidate, addressed to a specific file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEdit {
    /// The file the edit applies to.
    pub file: Utf8PathBuf,
    /// The edit itself.
    pub edit: TextEdit,
}

/// A self-consistent group of edits offered for one diagnostic.
///
/// Candidates apply all-or-nothing: if any edit cannot be admitted the
/// whole candidate is dropped, because the remaining edits were computed
/// assuming the rejected one lands too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixCandidate {
    description: String,
    edits: Vec<FileEdit>,
}

impl FixCandidate {
    /// Creates a candidate from its edits.
    #[must_use]
    pub fn new(description: impl Into<String>, edits: Vec<FileEdit>) -> Self {
        Self {
            description: description.into(),
            edits,
        }
    }

    /// Human-readable summary of what the fix does.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The edits, grouped by target file elsewhere.
    #[must_use]
    pub fn edits(&self) -> &[FileEdit] {
        &self.edits
    }
}

/// Source of diagnostics and fix candidates for the run.
///
/// The session handle is shared read-only across the whole run; no caller
/// may mutate project configuration through it.
pub trait AnalysisService: Send + Sync {
    /// Diagnostics currently reported for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Analysis`] when the query fails. Per-file
    /// failures are non-fatal to the run; the orchestrator records the
    /// file and moves on.
    fn diagnostics(&self, path: &Utf8Path) -> Result<Vec<Diagnostic>, EngineError>;

    /// Fix candidates for one diagnostic, best first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Analysis`] when the query fails.
    fn fixes(
        &self,
        path: &Utf8Path,
        diagnostic: &Diagnostic,
    ) -> Result<Vec<FixCandidate>, EngineError>;
}

impl<S: AnalysisService + ?Sized> AnalysisService for &S {
    fn diagnostics(&self, path: &Utf8Path) -> Result<Vec<Diagnostic>, EngineError> {
        (**self).diagnostics(path)
    }

    fn fixes(
        &self,
        path: &Utf8Path,
        diagnostic: &Diagnostic,
    ) -> Result<Vec<FixCandidate>, EngineError> {
        (**self).fixes(path, diagnostic)
    }
}

/// Adapter that filters another service's diagnostics by an allow-list.
#[derive(Debug)]
pub struct FilteredAnalysis<S> {
    inner: S,
    allow: AllowList,
}

impl<S: AnalysisService> FilteredAnalysis<S> {
    /// Wraps `inner`, acting only on codes `allow` permits.
    pub const fn new(inner: S, allow: AllowList) -> Self {
        Self { inner, allow }
    }
}

impl<S: AnalysisService> AnalysisService for FilteredAnalysis<S> {
    fn diagnostics(&self, path: &Utf8Path) -> Result<Vec<Diagnostic>, EngineError> {
        let mut diagnostics = self.inner.diagnostics(path)?;
        diagnostics.retain(|d| self.allow.permits(d.code()));
        Ok(diagnostics)
    }

    fn fixes(
        &self,
        path: &Utf8Path,
        diagnostic: &Diagnostic,
    ) -> Result<Vec<FixCandidate>, EngineError> {
        self.inner.fixes(path, diagnostic)
    }
}

/// Built-in provider backed by the syntax layer.
///
/// Reports parse errors as diagnostics and offers no fixes. Construction
/// discovers the project configuration; a missing `tsconfig.json` aborts
/// the run before any file is read.
#[derive(Debug)]
pub struct SyntaxAnalysis {
    project_config: Utf8PathBuf,
}

impl SyntaxAnalysis {
    /// Discovers `tsconfig.json` at or above `root` and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ProjectConfigMissing`] when no configuration
    /// file exists on the path from `root` to the filesystem root.
    pub fn open(root: &Utf8Path) -> Result<Self, EngineError> {
        let mut dir = root;
        loop {
            let candidate = dir.join("tsconfig.json");
            if candidate.is_file() {
                tracing::debug!(config = %candidate, "analysis session opened");
                return Ok(Self {
                    project_config: candidate,
                });
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => {
                    return Err(EngineError::ProjectConfigMissing {
                        root: root.to_owned(),
                    });
                }
            }
        }
    }

    /// Path of the discovered project configuration.
    #[must_use]
    pub fn project_config(&self) -> &Utf8Path {
        &self.project_config
    }
}

impl AnalysisService for SyntaxAnalysis {
    fn diagnostics(&self, path: &Utf8Path) -> Result<Vec<Diagnostic>, EngineError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| EngineError::analysis(path, e.to_string()))?;
        let language = Language::from_path(path)?;
        let parse = parse_source(language, &source)?;
        Ok(parse
            .errors()
            .into_iter()
            .map(|error| {
                Diagnostic::new(
                    SYNTAX_ERROR_CODE,
                    error.message,
                    path.to_owned(),
                    error.span,
                    Severity::Error,
                )
            })
            .collect())
    }

    fn fixes(
        &self,
        _path: &Utf8Path,
        _diagnostic: &Diagnostic,
    ) -> Result<Vec<FixCandidate>, EngineError> {
        Ok(Vec::new())
    }
}

/// Test double preloaded with diagnostics and fix candidates.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnalysis {
    diagnostics: BTreeMap<Utf8PathBuf, Vec<Diagnostic>>,
    fixes: BTreeMap<(Utf8PathBuf, u32, Span), Vec<FixCandidate>>,
}

impl ScriptedAnalysis {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic the service will report for its file.
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics
            .entry(diagnostic.file().to_owned())
            .or_default()
            .push(diagnostic);
        self
    }

    /// Adds a fix candidate for a diagnostic previously scripted.
    #[must_use]
    pub fn with_fix(mut self, diagnostic: &Diagnostic, candidate: FixCandidate) -> Self {
        self.fixes
            .entry((
                diagnostic.file().to_owned(),
                diagnostic.code(),
                diagnostic.span(),
            ))
            .or_default()
            .push(candidate);
        self
    }
}

impl AnalysisService for ScriptedAnalysis {
    fn diagnostics(&self, path: &Utf8Path) -> Result<Vec<Diagnostic>, EngineError> {
        Ok(self.diagnostics.get(path).cloned().unwrap_or_default())
    }

    fn fixes(
        &self,
        path: &Utf8Path,
        diagnostic: &Diagnostic,
    ) -> Result<Vec<FixCandidate>, EngineError> {
        let key = (path.to_owned(), diagnostic.code(), diagnostic.span());
        Ok(self.fixes.get(&key).cloned().unwrap_or_default())
    }
}
