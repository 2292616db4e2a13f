//! The codemod passes.
//!
//! Each pass is a pure function of one parsed buffer (plus the shared
//! read-only context): it computes an [`EditSet`] and never mutates the
//! tree or the buffer. Passes are idempotent — run over content that
//! already carries their fix, they produce an empty set — which makes a
//! whole re-invocation of the pipeline the retry unit.

use camino::Utf8Path;

use mender_core::{EditSet, TextEdit};
use mender_syntax::ParseResult;

use crate::error::EngineError;
use crate::index::SymbolIndex;
use crate::plan::{Plan, PassName};
use crate::probe::FileProbe;

mod diagnostic_fixes;
mod hoist_imports;
mod insert_missing_imports;
mod normalise_import_paths;
mod prefix_unused;
mod react_import;

pub use diagnostic_fixes::DiagnosticFixes;
pub use hoist_imports::HoistImports;
pub use insert_missing_imports::InsertMissingImports;
pub use normalise_import_paths::NormaliseImportPaths;
pub use prefix_unused::PrefixUnused;
pub use react_import::ReactImport;

/// Read-only context shared by every pass over one buffer.
pub struct PassContext<'a> {
    path: &'a Utf8Path,
    parse: &'a ParseResult,
    plan: &'a Plan,
    probe: &'a dyn FileProbe,
    index: &'a SymbolIndex,
    admitted_fixes: &'a [Vec<TextEdit>],
}

impl<'a> PassContext<'a> {
    /// Builds the context for one buffer.
    ///
    /// `path` is root-relative; `admitted_fixes` holds the ledger-admitted
    /// diagnostic-fix edits for this file, grouped by candidate.
    #[must_use]
    pub const fn new(
        path: &'a Utf8Path,
        parse: &'a ParseResult,
        plan: &'a Plan,
        probe: &'a dyn FileProbe,
        index: &'a SymbolIndex,
        admitted_fixes: &'a [Vec<TextEdit>],
    ) -> Self {
        Self {
            path,
            parse,
            plan,
            probe,
            index,
            admitted_fixes,
        }
    }

    /// Root-relative path of the buffer being repaired.
    #[must_use]
    pub const fn path(&self) -> &Utf8Path {
        self.path
    }

    /// The immutable parse of the buffer's current content.
    #[must_use]
    pub const fn parse(&self) -> &ParseResult {
        self.parse
    }

    /// The run configuration.
    #[must_use]
    pub const fn plan(&self) -> &Plan {
        self.plan
    }

    /// Existence probe for candidate import targets.
    #[must_use]
    pub const fn probe(&self) -> &dyn FileProbe {
        self.probe
    }

    /// Cross-file symbol presence index.
    #[must_use]
    pub const fn index(&self) -> &SymbolIndex {
        self.index
    }

    /// Diagnostic-fix edits admitted for this file, grouped by candidate.
    #[must_use]
    pub const fn admitted_fixes(&self) -> &[Vec<TextEdit>] {
        self.admitted_fixes
    }
}

/// A single composable repair over one buffer.
pub trait CodemodPass: Send + Sync {
    /// Stable name used in configuration and the report.
    fn name(&self) -> &'static str;

    /// Computes this pass's edits for the buffer in `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the pass cannot evaluate the buffer;
    /// an empty [`EditSet`] is the normal "nothing to do" outcome.
    fn run(&self, ctx: &PassContext<'_>) -> Result<EditSet, EngineError>;
}

/// Instantiates the passes a plan enables, in the plan's order.
#[must_use]
pub fn build_passes(names: &[PassName]) -> Vec<Box<dyn CodemodPass>> {
    names
        .iter()
        .map(|name| -> Box<dyn CodemodPass> {
            match name {
                PassName::DiagnosticFixes => Box::new(DiagnosticFixes),
                PassName::PrefixUnused => Box::new(PrefixUnused),
                PassName::InsertMissingImports => Box::new(InsertMissingImports),
                PassName::ReactImport => Box::new(ReactImport),
                PassName::NormaliseImportPaths => Box::new(NormaliseImportPaths),
                PassName::HoistImports => Box::new(HoistImports),
            }
        })
        .collect()
}
