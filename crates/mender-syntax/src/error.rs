//! Error types for the syntax layer.

use thiserror::Error;

use crate::language::Language;

/// Errors from parsing operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// The Tree-sitter parser could not be initialised for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInit {
        /// The language that failed to initialise.
        language: Language,
        /// Description of the failure.
        message: String,
    },

    /// The parser failed to produce a syntax tree.
    #[error("failed to parse {language}: {message}")]
    Parse {
        /// The language being parsed.
        language: Language,
        /// Description of the failure.
        message: String,
    },

    /// The file extension maps to no supported grammar.
    #[error("unsupported file extension: {extension}")]
    UnsupportedExtension {
        /// The extension that was not recognised.
        extension: String,
    },
}

impl SyntaxError {
    pub(crate) fn parser_init(language: Language, message: impl Into<String>) -> Self {
        Self::ParserInit {
            language,
            message: message.into(),
        }
    }

    pub(crate) fn parse(language: Language, message: impl Into<String>) -> Self {
        Self::Parse {
            language,
            message: message.into(),
        }
    }
}
