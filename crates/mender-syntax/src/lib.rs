//! Tree-sitter syntax layer for TypeScript and TSX sources.
//!
//! The repair pipeline never mutates syntax trees. Each file version is
//! parsed once into an immutable tree; passes read the tree to compute byte
//! spans for their edits, and only the orchestrator's apply step produces a
//! new buffer version. This module provides the parsing wrapper plus the
//! read-only queries the codemod passes need: import declarations, declared
//! local names with their scopes, identifier occurrences, and JSX detection.

mod error;
mod identifiers;
mod imports;
mod language;
mod parser;

pub use error::SyntaxError;
pub use identifiers::{DeclaredName, declared_names, occurrences_in};
pub use imports::{ImportDecl, import_insertion_offset, imports, needs_hoist};
pub use language::Language;
pub use parser::{ParseResult, Parser, SyntaxErrorInfo, parse_source};
