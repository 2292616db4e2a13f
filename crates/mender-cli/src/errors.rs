//! Error type and exit-code mapping for the binary.

use std::process::ExitCode;

use thiserror::Error;

use mender_engine::EngineError;

use crate::telemetry::TelemetryError;

/// Errors that terminate the binary with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Engine-level failure, including an unavailable analysis session.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Telemetry could not be initialised.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// Workspace discovery failed.
    #[error("file discovery failed: {0}")]
    Discovery(String),

    /// The workspace root is unusable.
    #[error("workspace root is not a directory: {0}")]
    InvalidRoot(String),

    /// Files were requested explicitly but none can be repaired.
    #[error("none of the requested files are repairable sources")]
    NoFixableFiles,

    /// The report could not be written to stdout.
    #[error("failed to write report: {0}")]
    Output(String),
}

impl CliError {
    /// Maps the error to the process exit code.
    ///
    /// Usage mistakes (bad root, no fixable files) exit with 2; everything
    /// else exits with 1.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidRoot(_) | Self::NoFixableFiles => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}
