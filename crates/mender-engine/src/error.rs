//! Error types for the repair engine.

use camino::Utf8PathBuf;
use thiserror::Error;

use mender_core::CoreError;
use mender_syntax::SyntaxError;

/// Errors raised while planning or executing a repair run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// An edit-model operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A syntax-layer operation failed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// No project configuration was found above the workspace root.
    ///
    /// The analysis session cannot start without one, so this aborts the
    /// whole run before any file is touched.
    #[error("no tsconfig.json found at or above {root}")]
    ProjectConfigMissing {
        /// The root the upward search started from.
        root: Utf8PathBuf,
    },

    /// The analysis service failed to answer a query.
    #[error("analysis query failed for {path}: {message}")]
    Analysis {
        /// The file being analysed.
        path: Utf8PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A plan file could not be read.
    #[error("failed to read plan {path}")]
    PlanIo {
        /// The plan file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A plan file could not be deserialised.
    #[error("invalid plan {path}: {source}")]
    PlanFormat {
        /// The plan file path.
        path: Utf8PathBuf,
        /// The underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {message}")]
    WorkerPool {
        /// Description of the failure.
        message: String,
    },

    /// A protocol payload could not be serialised or deserialised.
    #[error("protocol payload error: {source}")]
    Protocol {
        /// The underlying serialisation error.
        #[from]
        source: serde_json::Error,
    },
}

impl EngineError {
    /// Builds an [`EngineError::Analysis`] from any displayable failure.
    pub fn analysis(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::Analysis {
            path: path.into(),
            message: message.into(),
        }
    }
}
