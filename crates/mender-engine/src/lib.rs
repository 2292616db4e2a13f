//! Repair engine: analysis seam, codemod passes, and run orchestration.
//!
//! A run gathers diagnostics from an [`AnalysisService`], admits their fix
//! candidates through an all-or-nothing cross-file ledger, then runs the
//! configured codemod passes over each file. Per-file edit sets are merged
//! into one conflict-free set and applied in a single step, so every file
//! is wholly fixed or untouched. The same passes also serve the editor
//! boundary in [`protocol`], operating purely in memory.

mod analysis;
mod error;
mod index;
mod ledger;
mod orchestrator;
mod passes;
mod plan;
mod probe;
pub mod protocol;

pub use analysis::{
    AllowList, AnalysisService, FileEdit, FilteredAnalysis, FixCandidate, SYNTAX_ERROR_CODE,
    ScriptedAnalysis, SyntaxAnalysis,
};
pub use error::EngineError;
pub use index::SymbolIndex;
pub use ledger::CandidateLedger;
pub use orchestrator::{Orchestrator, RunPhase, repair_in_memory};
pub use passes::{
    CodemodPass, DiagnosticFixes, HoistImports, InsertMissingImports, NormaliseImportPaths,
    PassContext, PrefixUnused, ReactImport, build_passes,
};
pub use plan::{ImportRequest, PassName, Plan};
pub use probe::{FileProbe, FsProbe, MemoryProbe, normalise};
