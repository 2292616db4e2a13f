//! Command-line argument definitions for the `mender` binary.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Output format selection for the run report.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render a human-readable summary.
    Human,
    /// Always emit the raw report JSON.
    Json,
}

/// Log line rendering for telemetry on stderr.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    /// One-line compact rendering.
    #[default]
    Compact,
    /// Newline-delimited JSON events.
    Json,
}

/// Command-line interface for the mender repair pipeline.
#[derive(Parser, Debug)]
#[command(name = "mender", version, about = "Applies automatic source repairs")]
pub struct Cli {
    /// Source files to repair, relative to the workspace root. With no
    /// files, every TypeScript source under the root is discovered.
    #[arg(value_name = "FILES")]
    pub files: Vec<Utf8PathBuf>,

    /// Path to a JSON plan describing passes and their parameters.
    #[arg(long, value_name = "PLAN")]
    pub plan: Option<Utf8PathBuf>,

    /// Workspace root; defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<Utf8PathBuf>,

    /// Controls how the run report is rendered on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub output: OutputFormat,

    /// Controls how log lines are rendered on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Tracing filter expression, e.g. `info` or `mender_engine=debug`.
    #[arg(long, value_name = "EXPR", default_value = "info")]
    pub log_filter: String,

    /// Upper bound on concurrent per-file workers; overrides the plan.
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_parse_into_expected_fields() {
        let cli = Cli::parse_from([
            "mender",
            "--root",
            "/workspace",
            "--plan",
            "plan.json",
            "--output",
            "json",
            "--max-concurrency",
            "4",
            "src/app.tsx",
        ]);
        assert_eq!(cli.root.as_deref(), Some(camino::Utf8Path::new("/workspace")));
        assert_eq!(cli.plan.as_deref(), Some(camino::Utf8Path::new("plan.json")));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.max_concurrency, Some(4));
        assert_eq!(cli.files, [Utf8PathBuf::from("src/app.tsx")]);
    }

    #[test]
    fn defaults_cover_a_bare_invocation() {
        let cli = Cli::parse_from(["mender"]);
        assert!(cli.files.is_empty());
        assert_eq!(cli.output, OutputFormat::Auto);
        assert_eq!(cli.log_format, LogFormat::Compact);
        assert_eq!(cli.log_filter, "info");
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
