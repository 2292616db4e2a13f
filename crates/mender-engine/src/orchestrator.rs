//! Run orchestration: collect, merge, apply, persist, report.
//!
//! A run moves through fixed phases. Collection is sequential because the
//! analysis service is the suspension point and the candidate ledger must
//! admit cross-file fixes in a single order. Per-file repair is
//! embarrassingly parallel afterwards: each file is parsed, run through the
//! passes, merged, and applied independently, then persisted. A file is
//! wholly fixed or untouched; there is no partial write. Per-file failures
//! are recorded and skipped, never fatal; only an unavailable analysis
//! session aborts the run.

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use strum::Display;

use mender_core::{EditSet, RunReport, SourceBuffer, TextEdit, merge};
use mender_syntax::{Language, parse_source};

use crate::analysis::{AnalysisService, FilteredAnalysis};
use crate::error::EngineError;
use crate::index::SymbolIndex;
use crate::ledger::CandidateLedger;
use crate::passes::{CodemodPass, PassContext, build_passes};
use crate::plan::Plan;
use crate::probe::{FileProbe, FsProbe};

/// Phases a run moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RunPhase {
    /// Session and configuration validation.
    Init,
    /// Buffer reads, diagnostic gathering, candidate admission.
    Collecting,
    /// Per-file conflict resolution.
    Merging,
    /// Per-file buffer rewriting.
    Applying,
    /// Writing changed buffers back to disk.
    Persisting,
    /// Terminal success.
    Done,
    /// Terminal failure.
    Failed,
}

/// Per-file result of the parallel repair phase.
struct FileOutcome {
    relative: Utf8PathBuf,
    result: Result<(SourceBuffer, FileStats), EngineError>,
}

/// Counters contributed by one repaired file.
struct FileStats {
    per_pass: Vec<(String, usize)>,
    conflicts: usize,
}

/// Drives one whole repair run over a set of files.
pub struct Orchestrator<'a> {
    analysis: &'a dyn AnalysisService,
    plan: &'a Plan,
    root: &'a Utf8Path,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator for one run.
    ///
    /// The analysis session must already be open; failing to open one is
    /// the caller's fatal `Init` outcome.
    #[must_use]
    pub const fn new(analysis: &'a dyn AnalysisService, plan: &'a Plan, root: &'a Utf8Path) -> Self {
        Self {
            analysis,
            plan,
            root,
        }
    }

    /// Repairs the given root-relative files and reports the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkerPool`] when the bounded worker pool
    /// cannot be built. Per-file failures do not error; they are recorded
    /// in the report's `errored_files`.
    pub fn run(&self, files: &[Utf8PathBuf]) -> Result<RunReport, EngineError> {
        let mut report = RunReport::new();
        let passes = build_passes(self.plan.passes());
        let probe = FsProbe::new(self.root);

        tracing::debug!(phase = %RunPhase::Collecting, files = files.len(), "run started");
        let (workload, ledger) = self.collect(files, &mut report);

        let index = SymbolIndex::build(
            self.plan,
            workload
                .iter()
                .map(|(relative, buffer)| (relative.as_path(), buffer.content())),
        );

        tracing::debug!(phase = %RunPhase::Merging, "per-file repair started");
        let outcomes = self.repair_parallel(workload, &ledger, &passes, &probe, &index)?;

        tracing::debug!(phase = %RunPhase::Persisting, "writing changed buffers");
        for outcome in outcomes {
            match outcome.result {
                Ok((mut buffer, stats)) => {
                    for (pass, units) in stats.per_pass {
                        report.record_pass(&pass, units);
                    }
                    report.record_conflicts(stats.conflicts);
                    if let Err(error) = buffer.persist() {
                        tracing::warn!(file = %outcome.relative, %error, "persist failed");
                        report.record_errored_file(outcome.relative);
                        continue;
                    }
                    report.record_file();
                }
                Err(error) => {
                    tracing::warn!(file = %outcome.relative, %error, "file skipped");
                    report.record_errored_file(outcome.relative);
                }
            }
        }

        tracing::debug!(phase = %RunPhase::Done, files = report.files, "run finished");
        Ok(report)
    }

    /// Sequential collection: read buffers, gather allow-listed
    /// diagnostics, admit fix candidates through the ledger.
    fn collect(
        &self,
        files: &[Utf8PathBuf],
        report: &mut RunReport,
    ) -> (Vec<(Utf8PathBuf, SourceBuffer)>, CandidateLedger) {
        let filtered =
            FilteredAnalysis::new(self.analysis, self.plan.diagnostic_allow_list().clone());
        let mut ledger = CandidateLedger::new();
        let mut workload = Vec::with_capacity(files.len());

        for relative in files {
            let absolute = self.root.join(relative);
            let buffer = match SourceBuffer::from_disk(absolute.clone()) {
                Ok(buffer) => buffer,
                Err(error) => {
                    tracing::warn!(file = %relative, %error, "unreadable, skipped");
                    report.record_errored_file(relative.clone());
                    continue;
                }
            };

            match filtered.diagnostics(&absolute) {
                Ok(diagnostics) => {
                    for diagnostic in &diagnostics {
                        match filtered.fixes(&absolute, diagnostic) {
                            Ok(candidates) => {
                                if let Some(first) = candidates.first()
                                    && !ledger.admit(first)
                                {
                                    tracing::debug!(
                                        file = %relative,
                                        code = diagnostic.code(),
                                        "fix candidate conflicted, dropped"
                                    );
                                }
                            }
                            Err(error) => {
                                tracing::warn!(file = %relative, %error, "fix lookup failed");
                            }
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(file = %relative, %error, "diagnostics unavailable, skipped");
                    report.record_errored_file(relative.clone());
                    continue;
                }
            }

            workload.push((relative.clone(), buffer));
        }

        report.record_conflicts(ledger.rejected());
        (workload, ledger)
    }

    /// Runs the per-file repair on a bounded worker pool.
    fn repair_parallel(
        &self,
        workload: Vec<(Utf8PathBuf, SourceBuffer)>,
        ledger: &CandidateLedger,
        passes: &[Box<dyn CodemodPass>],
        probe: &FsProbe,
        index: &SymbolIndex,
    ) -> Result<Vec<FileOutcome>, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.plan.max_concurrency().unwrap_or(0))
            .build()
            .map_err(|e| EngineError::WorkerPool {
                message: e.to_string(),
            })?;

        Ok(pool.install(|| {
            workload
                .into_par_iter()
                .map(|(relative, mut buffer)| {
                    let admitted = ledger.admitted_for(buffer.path());
                    let result =
                        repair_buffer(&relative, &mut buffer, self.plan, probe, index, admitted, passes)
                            .map(|stats| (buffer, stats));
                    FileOutcome { relative, result }
                })
                .collect()
        }))
    }
}

/// Runs the passes over one buffer, merges their edits, and applies the
/// survivors. The shared entry point for disk runs and the editor
/// boundary.
fn repair_buffer(
    relative: &Utf8Path,
    buffer: &mut SourceBuffer,
    plan: &Plan,
    probe: &dyn FileProbe,
    index: &SymbolIndex,
    admitted: &[Vec<TextEdit>],
    passes: &[Box<dyn CodemodPass>],
) -> Result<FileStats, EngineError> {
    let language = Language::from_path(relative)?;
    let parse = parse_source(language, buffer.content())?;
    let ctx = PassContext::new(relative, &parse, plan, probe, index, admitted);

    let mut sets: Vec<EditSet> = Vec::with_capacity(passes.len());
    for pass in passes {
        sets.push(pass.run(&ctx)?);
    }

    let outcome = merge(&sets);
    let per_pass = passes
        .iter()
        .zip(outcome.accepted_units_by_pass())
        .map(|(pass, units)| (pass.name().to_owned(), *units))
        .collect();

    buffer.apply(outcome.accepted())?;
    Ok(FileStats {
        per_pass,
        conflicts: outcome.skipped_conflicts(),
    })
}

/// Repairs a single in-memory buffer with a caller-supplied probe.
///
/// Used by the editor boundary, where file contents arrive over the wire
/// and no analysis session exists; the diagnostic-fixes pass contributes
/// nothing because no candidates were admitted.
///
/// # Errors
///
/// Propagates [`EngineError`] from parsing and edit application.
pub fn repair_in_memory(
    relative: &Utf8Path,
    buffer: &mut SourceBuffer,
    plan: &Plan,
    probe: &dyn FileProbe,
    index: &SymbolIndex,
) -> Result<RunReport, EngineError> {
    let passes = build_passes(plan.passes());
    let stats = repair_buffer(relative, buffer, plan, probe, index, &[], &passes)?;

    let mut report = RunReport::new();
    report.record_file();
    for (pass, units) in stats.per_pass {
        report.record_pass(&pass, units);
    }
    report.record_conflicts(stats.conflicts);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use mender_core::{Diagnostic, Severity, Span};

    use super::*;
    use crate::analysis::{FileEdit, FixCandidate, ScriptedAnalysis};

    struct Workspace {
        _dir: tempfile::TempDir,
        root: Utf8PathBuf,
    }

    fn workspace(files: &[(&str, &str)]) -> Workspace {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
        for (relative, content) in files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("mkdir");
            }
            fs::write(&path, content).expect("seed");
        }
        Workspace { _dir: dir, root }
    }

    fn read(ws: &Workspace, relative: &str) -> String {
        fs::read_to_string(ws.root.join(relative)).expect("read back")
    }

    #[test]
    fn run_hoists_and_reports_one_unit() {
        let ws = workspace(&[("a.ts", "export default function f(){}\nimport X from 'x'\n")]);
        let analysis = ScriptedAnalysis::new();
        let plan = Plan::default();
        let orchestrator = Orchestrator::new(&analysis, &plan, &ws.root);

        let report = orchestrator
            .run(&[Utf8PathBuf::from("a.ts")])
            .expect("run");

        assert!(report.ok);
        assert_eq!(report.files, 1);
        assert_eq!(report.per_codemod.get("hoist-imports"), Some(&1));
        assert_eq!(
            read(&ws, "a.ts"),
            "import X from 'x'\nexport default function f(){}\n"
        );
    }

    #[test]
    fn untouched_files_are_not_rewritten() {
        let ws = workspace(&[("clean.ts", "const x = 1;\n")]);
        let analysis = ScriptedAnalysis::new();
        let plan = Plan::default();
        let orchestrator = Orchestrator::new(&analysis, &plan, &ws.root);

        let before = fs::metadata(ws.root.join("clean.ts"))
            .and_then(|m| m.modified())
            .expect("mtime");
        let report = orchestrator
            .run(&[Utf8PathBuf::from("clean.ts")])
            .expect("run");
        let after = fs::metadata(ws.root.join("clean.ts"))
            .and_then(|m| m.modified())
            .expect("mtime");

        assert_eq!(report.edits_total, 0);
        assert_eq!(before, after);
    }

    #[test]
    fn admitted_diagnostic_fix_is_applied() {
        let ws = workspace(&[("a.ts", "const value: number = wrong;\n")]);
        let file = ws.root.join("a.ts");
        let diagnostic = Diagnostic::new(
            2304,
            "cannot find name 'wrong'",
            file.clone(),
            Span::new(22, 5),
            Severity::Error,
        );
        let candidate = FixCandidate::new(
            "replace with literal",
            vec![FileEdit {
                file: file.clone(),
                edit: TextEdit::replace(Span::new(22, 5), "0"),
            }],
        );
        let analysis = ScriptedAnalysis::new()
            .with_diagnostic(diagnostic.clone())
            .with_fix(&diagnostic, candidate);
        let plan = Plan::default();
        let orchestrator = Orchestrator::new(&analysis, &plan, &ws.root);

        let report = orchestrator
            .run(&[Utf8PathBuf::from("a.ts")])
            .expect("run");

        assert_eq!(report.per_codemod.get("diagnostic-fixes"), Some(&1));
        assert_eq!(read(&ws, "a.ts"), "const value: number = 0;\n");
    }

    #[test]
    fn report_counts_only_units_that_survived_the_merge() {
        let ws = workspace(&[("a.ts", "const a = 1;\nconst b = 2;\n")]);
        let file = ws.root.join("a.ts");
        // The fix rewrites `b` in place, colliding with its rename.
        let diagnostic = Diagnostic::new(
            2551,
            "cannot find name 'b'",
            file.clone(),
            Span::new(19, 1),
            Severity::Error,
        );
        let candidate = FixCandidate::new(
            "rename to bee",
            vec![FileEdit {
                file: file.clone(),
                edit: TextEdit::replace(Span::new(19, 1), "bee"),
            }],
        );
        let analysis = ScriptedAnalysis::new()
            .with_diagnostic(diagnostic.clone())
            .with_fix(&diagnostic, candidate);
        let plan: Plan =
            serde_json::from_value(serde_json::json!({ "unusedNames": ["a", "b"] }))
                .expect("plan");
        let orchestrator = Orchestrator::new(&analysis, &plan, &ws.root);

        let report = orchestrator
            .run(&[Utf8PathBuf::from("a.ts")])
            .expect("run");

        // Two renames were proposed; only the `a` unit applied.
        assert_eq!(report.per_codemod.get("prefix-unused"), Some(&1));
        assert_eq!(report.per_codemod.get("diagnostic-fixes"), Some(&1));
        assert_eq!(report.edits_total, 2);
        assert_eq!(report.conflicts_skipped, 1);
        assert_eq!(read(&ws, "a.ts"), "const _a = 1;\nconst bee = 2;\n");
    }

    #[test]
    fn hoist_withdraws_whole_when_a_fix_claims_an_import() {
        let ws = workspace(&[("a.ts", "const x = 1;\nimport A from 'a';\n")]);
        let file = ws.root.join("a.ts");
        let diagnostic = Diagnostic::new(
            2307,
            "cannot find module 'a'",
            file.clone(),
            Span::new(13, 19),
            Severity::Error,
        );
        let candidate = FixCandidate::new(
            "correct the module path",
            vec![FileEdit {
                file: file.clone(),
                edit: TextEdit::replace(Span::new(13, 19), "import A from 'b';\n"),
            }],
        );
        let analysis = ScriptedAnalysis::new()
            .with_diagnostic(diagnostic.clone())
            .with_fix(&diagnostic, candidate);
        let plan = Plan::default();
        let orchestrator = Orchestrator::new(&analysis, &plan, &ws.root);

        let report = orchestrator
            .run(&[Utf8PathBuf::from("a.ts")])
            .expect("run");

        // The hoist's deletion lost to the fix, so its insertion must not
        // land either; the import appears exactly once.
        let fixed = read(&ws, "a.ts");
        assert_eq!(fixed.matches("import A").count(), 1);
        assert_eq!(fixed, "const x = 1;\nimport A from 'b';\n");
        assert_eq!(report.per_codemod.get("hoist-imports"), None);
        assert_eq!(report.conflicts_skipped, 1);
    }

    #[test]
    fn diagnostics_outside_the_allow_list_are_ignored() {
        let ws = workspace(&[("a.ts", "const value = wrong;\n")]);
        let file = ws.root.join("a.ts");
        let diagnostic = Diagnostic::new(
            7006,
            "implicit any",
            file.clone(),
            Span::new(14, 5),
            Severity::Warning,
        );
        let candidate = FixCandidate::new(
            "should never apply",
            vec![FileEdit {
                file,
                edit: TextEdit::replace(Span::new(14, 5), "0"),
            }],
        );
        let analysis = ScriptedAnalysis::new()
            .with_diagnostic(diagnostic.clone())
            .with_fix(&diagnostic, candidate);
        let plan = Plan::default();
        let orchestrator = Orchestrator::new(&analysis, &plan, &ws.root);

        let report = orchestrator
            .run(&[Utf8PathBuf::from("a.ts")])
            .expect("run");

        assert_eq!(report.edits_total, 0);
        assert_eq!(read(&ws, "a.ts"), "const value = wrong;\n");
    }

    #[test]
    fn missing_file_is_recorded_and_run_continues() {
        let ws = workspace(&[("good.ts", "const x = 1;\nimport A from 'a';\n")]);
        let analysis = ScriptedAnalysis::new();
        let plan = Plan::default();
        let orchestrator = Orchestrator::new(&analysis, &plan, &ws.root);

        let report = orchestrator
            .run(&[Utf8PathBuf::from("gone.ts"), Utf8PathBuf::from("good.ts")])
            .expect("run");

        assert_eq!(report.files, 1);
        assert_eq!(report.errored_files, vec![Utf8PathBuf::from("gone.ts")]);
        assert_eq!(
            read(&ws, "good.ts"),
            "import A from 'a';\nconst x = 1;\n"
        );
    }

    #[test]
    fn bounded_concurrency_processes_all_files() {
        let sources: Vec<(String, String)> = (0..8)
            .map(|i| {
                (
                    format!("f{i}.ts"),
                    format!("const x{i} = 1;\nimport A from 'a';\n"),
                )
            })
            .collect();
        let refs: Vec<(&str, &str)> = sources
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
            .collect();
        let ws = workspace(&refs);
        let analysis = ScriptedAnalysis::new();
        let plan = Plan::default().with_max_concurrency(Some(2));
        let orchestrator = Orchestrator::new(&analysis, &plan, &ws.root);

        let files: Vec<Utf8PathBuf> = sources
            .iter()
            .map(|(name, _)| Utf8PathBuf::from(name))
            .collect();
        let report = orchestrator.run(&files).expect("run");

        assert_eq!(report.files, 8);
        assert_eq!(report.per_codemod.get("hoist-imports"), Some(&8));
    }

    #[test]
    fn second_run_applies_nothing_further() {
        let ws = workspace(&[("a.tsx", "export const App = () => <div/>;\n")]);
        let analysis = ScriptedAnalysis::new();
        let plan = Plan::default();
        let orchestrator = Orchestrator::new(&analysis, &plan, &ws.root);
        let files = [Utf8PathBuf::from("a.tsx")];

        let first = orchestrator.run(&files).expect("first run");
        assert_eq!(first.per_codemod.get("react-import"), Some(&1));

        let second = orchestrator.run(&files).expect("second run");
        assert_eq!(second.edits_total, 0);
    }
}
