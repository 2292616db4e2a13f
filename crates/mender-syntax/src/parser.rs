//! Tree-sitter parsing wrapper with error recovery.
//!
//! Tree-sitter is error-tolerant: a parse always yields a tree, possibly
//! containing ERROR or MISSING nodes. The built-in syntax diagnostics
//! provider surfaces those nodes as findings.

use mender_core::Span;

use crate::error::SyntaxError;
use crate::language::Language;

/// An immutable parse of one buffer version.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
    language: Language,
}

impl ParseResult {
    /// The parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// The source text that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The dialect the source was parsed as.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node, or an empty string for ranges that
    /// fall outside the buffer.
    #[must_use]
    pub fn node_text(&self, node: tree_sitter::Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    /// Whether the tree contains ERROR or MISSING nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects every syntax error in the tree.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &self.source, &mut errors);
        errors
    }

    /// Whether the tree contains any JSX element.
    #[must_use]
    pub fn contains_jsx(&self) -> bool {
        contains_kind(
            self.tree.root_node(),
            &["jsx_element", "jsx_self_closing_element"],
        )
    }
}

/// A syntax error located within a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error node.
    pub span: Span,
    /// Human-readable description.
    pub message: String,
}

/// Tree-sitter parser configured for one dialect.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: Language,
}

impl Parser {
    /// Creates a parser for the given dialect.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParserInit`] when the grammar cannot be
    /// loaded.
    pub fn new(language: Language) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;
        Ok(Self { inner, language })
    }

    /// Parses source text into an immutable tree.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::Parse`] when no tree is produced; this is
    /// rare and indicates a parser configuration problem rather than bad
    /// input.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parsing failed"))?;
        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

/// Parses one buffer with a throwaway parser instance.
///
/// # Errors
///
/// Propagates [`SyntaxError`] from parser construction and parsing.
pub fn parse_source(language: Language, source: &str) -> Result<ParseResult, SyntaxError> {
    Parser::new(language)?.parse(source)
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, source: &str, errors: &mut Vec<SyntaxErrorInfo>) {
    if node.is_error() || node.is_missing() {
        let range = node.byte_range();
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            let context = source.get(range.clone()).unwrap_or_default();
            let snippet: String = context.chars().take(40).collect();
            format!("syntax error near '{snippet}'")
        };
        errors.push(SyntaxErrorInfo {
            span: Span::new(range.start, range.len()),
            message,
        });
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, source, errors);
    }
}

fn contains_kind(node: tree_sitter::Node<'_>, kinds: &[&str]) -> bool {
    if kinds.contains(&node.kind()) {
        return true;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if contains_kind(child, kinds) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Language::TypeScript, "const x: number = 1;\n")]
    #[case(Language::Tsx, "export const App = () => <div/>;\n")]
    fn parses_valid_source_without_errors(#[case] language: Language, #[case] source: &str) {
        let result = parse_source(language, source).expect("parse");
        assert!(!result.has_errors());
        assert_eq!(result.language(), language);
    }

    #[test]
    fn reports_syntax_errors_with_spans() {
        let result = parse_source(Language::TypeScript, "function broken( {\n").expect("parse");
        assert!(result.has_errors());
        assert!(!result.errors().is_empty());
    }

    #[rstest]
    #[case("const x = <Widget/>;\n", true)]
    #[case("const x = 1;\n", false)]
    fn detects_jsx_elements(#[case] source: &str, #[case] expected: bool) {
        let result = parse_source(Language::Tsx, source).expect("parse");
        assert_eq!(result.contains_jsx(), expected);
    }
}
