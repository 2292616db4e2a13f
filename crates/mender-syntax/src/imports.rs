//! Import-declaration scanning.
//!
//! Queries used by the import-centric codemod passes: the full list of
//! import declarations with their specifiers and bound names, the hoist
//! trigger (an import appearing after a non-import statement), and the
//! offset where a new import should be inserted.

use mender_core::Span;

use crate::parser::ParseResult;

/// One `import ... from "..."` declaration at the top level of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    span: Span,
    specifier: String,
    specifier_span: Span,
    default_name: Option<String>,
    namespace_name: Option<String>,
    named: Vec<String>,
    text: String,
}

impl ImportDecl {
    /// Byte range of the whole declaration, including one trailing newline
    /// when present, so a deletion removes the line rather than leaving a
    /// blank.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// The module specifier without its quotes.
    #[must_use]
    pub fn specifier(&self) -> &str {
        &self.specifier
    }

    /// Byte range of the specifier text inside the quotes.
    #[must_use]
    pub const fn specifier_span(&self) -> Span {
        self.specifier_span
    }

    /// Default-imported name, when present.
    #[must_use]
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Namespace-imported name (`import * as ns`), when present.
    #[must_use]
    pub fn namespace_name(&self) -> Option<&str> {
        self.namespace_name.as_deref()
    }

    /// Named imports, using the imported (pre-alias) names.
    #[must_use]
    pub fn named(&self) -> &[String] {
        &self.named
    }

    /// Statement text without the trailing newline.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this declaration binds `name` in any clause position.
    #[must_use]
    pub fn binds(&self, name: &str) -> bool {
        self.default_name.as_deref() == Some(name)
            || self.namespace_name.as_deref() == Some(name)
            || self.named.iter().any(|n| n == name)
    }
}

/// Collects the import declarations at the top level of the parsed module,
/// in source order.
#[must_use]
pub fn imports(parse: &ParseResult) -> Vec<ImportDecl> {
    let root = parse.root_node();
    let mut cursor = root.walk();
    let mut found = Vec::new();
    for child in root.children(&mut cursor) {
        if child.kind() == "import_statement" {
            if let Some(decl) = import_from_node(parse, child) {
                found.push(decl);
            }
        }
    }
    found
}

/// Whether any import declaration appears after a non-import statement.
///
/// Leading comments do not interrupt the import run; any other statement
/// does, and an import following it triggers the hoist pass.
#[must_use]
pub fn needs_hoist(parse: &ParseResult) -> bool {
    let root = parse.root_node();
    let mut cursor = root.walk();
    let mut seen_non_import = false;
    for child in root.children(&mut cursor) {
        match child.kind() {
            "comment" => {}
            "import_statement" => {
                if seen_non_import {
                    return true;
                }
            }
            _ => seen_non_import = true,
        }
    }
    false
}

/// Byte offset where a new import declaration should be inserted: just
/// after the last import in the leading run, or offset 0 when the module
/// has no leading imports.
#[must_use]
pub fn import_insertion_offset(parse: &ParseResult) -> usize {
    let root = parse.root_node();
    let mut cursor = root.walk();
    let mut offset = 0;
    for child in root.children(&mut cursor) {
        match child.kind() {
            "comment" => {}
            "import_statement" => {
                offset = end_including_newline(parse.source(), child.byte_range().end);
            }
            _ => break,
        }
    }
    offset
}

fn import_from_node(parse: &ParseResult, node: tree_sitter::Node<'_>) -> Option<ImportDecl> {
    let source = parse.source();
    let range = node.byte_range();
    let end = end_including_newline(source, range.end);
    let text = source.get(range.clone())?.to_owned();

    let source_node = node.child_by_field_name("source")?;
    let (specifier, specifier_span) = specifier_of(parse, source_node);

    let mut default_name = None;
    let mut namespace_name = None;
    let mut named = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "import_clause" {
            collect_clause(parse, child, &mut default_name, &mut namespace_name, &mut named);
        }
    }

    Some(ImportDecl {
        span: Span::new(range.start, end - range.start),
        specifier,
        specifier_span,
        default_name,
        namespace_name,
        named,
        text,
    })
}

fn collect_clause(
    parse: &ParseResult,
    clause: tree_sitter::Node<'_>,
    default_name: &mut Option<String>,
    namespace_name: &mut Option<String>,
    named: &mut Vec<String>,
) {
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => *default_name = Some(parse.node_text(child).to_owned()),
            "namespace_import" => {
                let mut ns_cursor = child.walk();
                for ns_child in child.named_children(&mut ns_cursor) {
                    if ns_child.kind() == "identifier" {
                        *namespace_name = Some(parse.node_text(ns_child).to_owned());
                    }
                }
            }
            "named_imports" => {
                let mut spec_cursor = child.walk();
                for spec in child.named_children(&mut spec_cursor) {
                    if spec.kind() == "import_specifier"
                        && let Some(name_node) = spec.child_by_field_name("name")
                    {
                        named.push(parse.node_text(name_node).to_owned());
                    }
                }
            }
            _ => {}
        }
    }
}

/// Extracts the quoted specifier text and its inner span from the string
/// node in source position.
fn specifier_of(parse: &ParseResult, string_node: tree_sitter::Node<'_>) -> (String, Span) {
    let mut cursor = string_node.walk();
    for child in string_node.named_children(&mut cursor) {
        if child.kind() == "string_fragment" {
            let range = child.byte_range();
            return (
                parse.node_text(child).to_owned(),
                Span::new(range.start, range.len()),
            );
        }
    }
    // Empty specifier: point span just inside the opening quote.
    (String::new(), Span::point(string_node.byte_range().start + 1))
}

fn end_including_newline(source: &str, end: usize) -> usize {
    let bytes = source.as_bytes();
    match bytes.get(end) {
        Some(b'\n') => end + 1,
        Some(b'\r') if bytes.get(end + 1) == Some(&b'\n') => end + 2,
        _ => end,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::language::Language;
    use crate::parser::parse_source;

    fn parse(source: &str) -> ParseResult {
        parse_source(Language::Tsx, source).expect("parse")
    }

    #[test]
    fn collects_specifiers_and_bound_names() {
        let result = parse(concat!(
            "import React from 'react';\n",
            "import { X, Y as Z } from './components/X';\n",
            "import * as path from 'node:path';\n",
        ));

        let decls = imports(&result);
        assert_eq!(decls.len(), 3);

        assert_eq!(decls[0].specifier(), "react");
        assert_eq!(decls[0].default_name(), Some("React"));

        assert_eq!(decls[1].specifier(), "./components/X");
        assert_eq!(decls[1].named(), &["X", "Y"]);
        assert!(decls[1].binds("X"));
        assert!(!decls[1].binds("Q"));

        assert_eq!(decls[2].namespace_name(), Some("path"));
        assert!(decls[2].binds("path"));
    }

    #[test]
    fn declaration_span_includes_trailing_newline() {
        let result = parse("import X from 'x';\nconst y = X;\n");
        let decls = imports(&result);
        assert_eq!(decls[0].span(), Span::new(0, 19));
        assert_eq!(decls[0].text(), "import X from 'x';");
    }

    #[rstest]
    #[case("import A from 'a';\nconst x = 1;\n", false)]
    #[case("const x = 1;\nimport A from 'a';\n", true)]
    #[case("// header comment\nimport A from 'a';\n", false)]
    #[case("export default function f(){}\nimport X from 'x'\n", true)]
    fn hoist_triggers_on_trailing_imports(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(needs_hoist(&parse(source)), expected);
    }

    #[rstest]
    #[case("const x = 1;\n", 0)]
    #[case("import A from 'a';\nconst x = 1;\n", 19)]
    #[case("// note\nimport A from 'a';\nimport B from 'b';\nrun();\n", 46)]
    fn insertion_offset_follows_leading_import_run(#[case] source: &str, #[case] expected: usize) {
        assert_eq!(import_insertion_offset(&parse(source)), expected);
    }

    #[test]
    fn specifier_span_covers_inner_text_only() {
        let result = parse("import X from './util';\n");
        let decls = imports(&result);
        let span = decls[0].specifier_span();
        assert_eq!(
            result.source().get(span.start..span.end()),
            Some("./util")
        );
    }
}
