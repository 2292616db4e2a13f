//! Run configuration: the pass list and per-pass parameters.
//!
//! A plan is a JSON document supplied on the command line or embedded in an
//! editor request. Every field is optional; the defaults run the full pass
//! list with an empty parameter set. Unknown pass names and unknown fields
//! are rejected at load time rather than silently ignored.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::analysis::AllowList;
use crate::error::EngineError;

/// Names of the codemod passes, in their default execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PassName {
    /// Apply the first fix candidate for each allow-listed diagnostic.
    DiagnosticFixes,
    /// Rename flagged unused bindings to their `_`-prefixed form.
    PrefixUnused,
    /// Insert configured named imports that are not yet present.
    InsertMissingImports,
    /// Insert a default React import into JSX files that lack one.
    ReactImport,
    /// Rewrite extensionless relative specifiers to an existing file.
    NormaliseImportPaths,
    /// Move trailing import declarations to the top of the file.
    HoistImports,
}

impl PassName {
    /// The default pass order.
    ///
    /// Diagnostic fixes run first so analysis-provided edits win span
    /// conflicts against heuristic passes; hoisting runs last because it
    /// touches every import declaration.
    #[must_use]
    pub const fn default_order() -> [Self; 6] {
        [
            Self::DiagnosticFixes,
            Self::PrefixUnused,
            Self::InsertMissingImports,
            Self::ReactImport,
            Self::NormaliseImportPaths,
            Self::HoistImports,
        ]
    }
}

/// One required named import for a target file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImportRequest {
    /// The symbol to import.
    pub symbol: String,
    /// The file that exports the symbol, relative to the workspace root.
    pub from_file: Utf8PathBuf,
}

/// Declarative description of one repair run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Plan {
    passes: Vec<PassName>,
    unused_names: Vec<String>,
    required_imports: BTreeMap<Utf8PathBuf, Vec<ImportRequest>>,
    file_globs: Vec<String>,
    diagnostic_allow_list: AllowList,
    max_concurrency: Option<usize>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            passes: PassName::default_order().to_vec(),
            unused_names: Vec::new(),
            required_imports: BTreeMap::new(),
            file_globs: Vec::new(),
            diagnostic_allow_list: AllowList::default(),
            max_concurrency: None,
        }
    }
}

impl Plan {
    /// Reads and deserialises a plan file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PlanIo`] when the file cannot be read and
    /// [`EngineError::PlanFormat`] when it is not a valid plan document.
    pub fn load(path: &Utf8Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::PlanIo {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| EngineError::PlanFormat {
            path: path.to_owned(),
            source,
        })
    }

    /// The enabled passes, in execution order.
    #[must_use]
    pub fn passes(&self) -> &[PassName] {
        &self.passes
    }

    /// Names flagged as unused bindings to prefix.
    #[must_use]
    pub fn unused_names(&self) -> &[String] {
        &self.unused_names
    }

    /// Required named imports, keyed by target file relative to the root.
    #[must_use]
    pub const fn required_imports(&self) -> &BTreeMap<Utf8PathBuf, Vec<ImportRequest>> {
        &self.required_imports
    }

    /// Glob patterns restricting which discovered files are processed.
    #[must_use]
    pub fn file_globs(&self) -> &[String] {
        &self.file_globs
    }

    /// The diagnostic codes the run is allowed to act on.
    #[must_use]
    pub const fn diagnostic_allow_list(&self) -> &AllowList {
        &self.diagnostic_allow_list
    }

    /// Upper bound on concurrent per-file workers, when configured.
    #[must_use]
    pub const fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Replaces the concurrency bound, keeping the rest of the plan.
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit;
        self
    }
}
