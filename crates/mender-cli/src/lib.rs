//! Command-line front end for the repair pipeline.
//!
//! The binary parses arguments, initialises telemetry, opens the analysis
//! session, discovers or validates the file set, and drives one
//! orchestrated run. The run report is printed to stdout as JSON (or a
//! human summary on interactive terminals); diagnostics and progress go to
//! stderr via `tracing`.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;

use mender_core::RunReport;
use mender_engine::{Orchestrator, Plan, SyntaxAnalysis};
use mender_syntax::Language;

pub mod cli;
pub mod discovery;
pub mod errors;
pub mod telemetry;

use cli::{Cli, OutputFormat};
use errors::CliError;

/// Parses arguments, executes one run, and maps the outcome to an exit
/// code. Errors are rendered on `stderr`; the report lands on `stdout`.
#[must_use = "the exit code must reach the process"]
pub fn run<I>(
    args: I,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
    stdout_is_terminal: bool,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = write!(stderr, "{error}");
            return ExitCode::from(2);
        }
    };

    match execute(cli, stdout, stdout_is_terminal) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "mender: {error}");
            error.exit_code()
        }
    }
}

fn execute(cli: Cli, stdout: &mut dyn Write, stdout_is_terminal: bool) -> Result<(), CliError> {
    telemetry::initialise(cli.log_format, &cli.log_filter)?;

    let root = workspace_root(cli.root)?;
    let mut plan = cli
        .plan
        .as_deref()
        .map(Plan::load)
        .transpose()?
        .unwrap_or_default();
    if cli.max_concurrency.is_some() {
        plan = plan.with_max_concurrency(cli.max_concurrency);
    }

    // Opening the session is the one fatal step: without analysis the run
    // cannot honour its diagnostic-fix contract, so nothing is written.
    let analysis = SyntaxAnalysis::open(&root)?;

    let files = select_files(&cli.files, &root, &plan)?;
    tracing::info!(root = %root, files = files.len(), "starting repair run");

    let orchestrator = Orchestrator::new(&analysis, &plan, &root);
    let report = orchestrator.run(&files)?;

    render_report(&report, cli.output, stdout, stdout_is_terminal)
}

fn workspace_root(root: Option<Utf8PathBuf>) -> Result<Utf8PathBuf, CliError> {
    let root = root.map_or_else(default_root, Ok)?;
    if root.is_dir() {
        Ok(root)
    } else {
        Err(CliError::InvalidRoot(root.into_string()))
    }
}

fn default_root() -> Result<Utf8PathBuf, CliError> {
    let dir = std::env::current_dir().map_err(|e| CliError::InvalidRoot(e.to_string()))?;
    Utf8PathBuf::from_path_buf(dir).map_err(|dir| CliError::InvalidRoot(dir.display().to_string()))
}

/// Resolves the file set: explicit arguments are filtered to supported
/// dialects, a bare invocation walks the workspace.
fn select_files(
    requested: &[Utf8PathBuf],
    root: &Utf8Path,
    plan: &Plan,
) -> Result<Vec<Utf8PathBuf>, CliError> {
    if requested.is_empty() {
        return discovery::discover(root, plan.file_globs());
    }

    let supported: Vec<Utf8PathBuf> = requested
        .iter()
        .filter(|path| Language::from_path(path).is_ok())
        .cloned()
        .collect();
    if supported.is_empty() {
        return Err(CliError::NoFixableFiles);
    }
    for skipped in requested.iter().filter(|p| !supported.contains(p)) {
        tracing::warn!(file = %skipped, "unsupported extension, skipped");
    }
    Ok(supported)
}

fn render_report(
    report: &RunReport,
    format: OutputFormat,
    stdout: &mut dyn Write,
    stdout_is_terminal: bool,
) -> Result<(), CliError> {
    let human = match format {
        OutputFormat::Human => true,
        OutputFormat::Json => false,
        OutputFormat::Auto => stdout_is_terminal,
    };

    if human {
        render_human(report, stdout).map_err(|e| CliError::Output(e.to_string()))
    } else {
        let json =
            serde_json::to_string(report).map_err(|e| CliError::Output(e.to_string()))?;
        writeln!(stdout, "{json}").map_err(|e| CliError::Output(e.to_string()))
    }
}

fn render_human(report: &RunReport, stdout: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        stdout,
        "repaired {} edit(s) across {} file(s)",
        report.edits_total, report.files
    )?;
    for (pass, units) in &report.per_codemod {
        writeln!(stdout, "  {pass}: {units}")?;
    }
    if report.conflicts_skipped > 0 {
        writeln!(stdout, "  conflicts skipped: {}", report.conflicts_skipped)?;
    }
    for file in &report.errored_files {
        writeln!(stdout, "  errored: {file}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_unsupported_files_are_an_error() {
        let plan = Plan::default();
        let error = select_files(
            &[Utf8PathBuf::from("README.md")],
            Utf8Path::new("."),
            &plan,
        )
        .expect_err("no fixable files");
        assert!(matches!(error, CliError::NoFixableFiles));
    }

    #[test]
    fn explicit_mixed_files_keep_the_supported_ones() {
        let plan = Plan::default();
        let files = select_files(
            &[Utf8PathBuf::from("a.ts"), Utf8PathBuf::from("b.css")],
            Utf8Path::new("."),
            &plan,
        )
        .expect("files");
        assert_eq!(files, [Utf8PathBuf::from("a.ts")]);
    }

    #[test]
    fn json_rendering_emits_wire_fields() {
        let mut report = RunReport::new();
        report.record_file();
        report.record_pass("hoist-imports", 1);

        let mut out = Vec::new();
        render_report(&report, OutputFormat::Json, &mut out, true).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("\"edits_total\":1"));
        assert!(text.contains("\"hoist-imports\":1"));
    }

    #[test]
    fn human_rendering_lists_passes() {
        let mut report = RunReport::new();
        report.record_file();
        report.record_pass("prefix-unused", 2);
        report.record_conflicts(1);

        let mut out = Vec::new();
        render_report(&report, OutputFormat::Human, &mut out, false).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("2 edit(s) across 1 file(s)"));
        assert!(text.contains("prefix-unused: 2"));
        assert!(text.contains("conflicts skipped: 1"));
    }
}
