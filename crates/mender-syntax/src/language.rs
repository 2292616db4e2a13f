//! Language detection and Tree-sitter grammar selection.

use std::fmt;

use camino::Utf8Path;

use crate::error::SyntaxError;

/// Source dialects the pipeline can parse.
///
/// The TSX grammar is a superset used for `.tsx`, `.jsx`, and plain
/// JavaScript; `.ts` files use the stricter TypeScript grammar so legacy
/// type assertions parse correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// TypeScript source files (`.ts`, `.mts`, `.cts`).
    #[default]
    TypeScript,
    /// TSX and JavaScript source files (`.tsx`, `.jsx`, `.js`).
    Tsx,
}

impl Language {
    /// Detects the dialect from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" | "jsx" | "js" | "mjs" | "cjs" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Detects the dialect from a file path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnsupportedExtension`] for unrecognised or
    /// missing extensions.
    pub fn from_path(path: &Utf8Path) -> Result<Self, SyntaxError> {
        let extension = path.extension().unwrap_or_default();
        Self::from_extension(extension).ok_or_else(|| SyntaxError::UnsupportedExtension {
            extension: extension.to_owned(),
        })
    }

    /// Returns the Tree-sitter grammar for this dialect.
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Lower-case identifier for display and configuration keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
