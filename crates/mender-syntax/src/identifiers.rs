//! Declared-name and occurrence queries.
//!
//! The unused-binding pass needs two things: which local names a file
//! declares (with the scope each declaration belongs to), and every place
//! a given name occurs inside that scope so all occurrences can be renamed
//! together.

use mender_core::Span;

use crate::parser::ParseResult;

const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
];

/// A locally declared name and the scope it is visible in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredName {
    name: String,
    name_span: Span,
    scope: Span,
}

impl DeclaredName {
    /// The declared identifier text.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte range of the identifier at its declaration site.
    #[must_use]
    pub const fn name_span(&self) -> Span {
        self.name_span
    }

    /// Byte range of the enclosing function body, or the whole file for
    /// module-level declarations.
    #[must_use]
    pub const fn scope(&self) -> Span {
        self.scope
    }
}

/// Collects variable, parameter, and arrow-parameter declarations in
/// source order.
///
/// Destructuring patterns are skipped: renaming one binding inside a
/// pattern would change the shape being matched.
#[must_use]
pub fn declared_names(parse: &ParseResult) -> Vec<DeclaredName> {
    let mut found = Vec::new();
    collect_declarations(parse, parse.root_node(), &mut found);
    found
}

/// Collects every occurrence of `name` as a plain identifier within
/// `scope`, in source order. Property accesses (`obj.name`) and shorthand
/// property keys are not identifier nodes and are excluded by the grammar.
#[must_use]
pub fn occurrences_in(parse: &ParseResult, scope: Span, name: &str) -> Vec<Span> {
    let mut found = Vec::new();
    collect_occurrences(parse, parse.root_node(), scope, name, &mut found);
    found
}

fn collect_declarations(
    parse: &ParseResult,
    node: tree_sitter::Node<'_>,
    found: &mut Vec<DeclaredName>,
) {
    let ident = match node.kind() {
        "variable_declarator" => identifier_field(node, "name"),
        "required_parameter" | "optional_parameter" => identifier_field(node, "pattern"),
        // Bare single-parameter arrow: `x => ...` has no parameter list.
        "arrow_function" => identifier_field(node, "parameter"),
        _ => None,
    };
    if let Some(ident) = ident {
        let range = ident.byte_range();
        found.push(DeclaredName {
            name: parse.node_text(ident).to_owned(),
            name_span: Span::new(range.start, range.len()),
            scope: enclosing_scope(parse, node),
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_declarations(parse, child, found);
    }
}

fn identifier_field<'a>(
    node: tree_sitter::Node<'a>,
    field: &str,
) -> Option<tree_sitter::Node<'a>> {
    node.child_by_field_name(field)
        .filter(|n| n.kind() == "identifier")
}

fn enclosing_scope(parse: &ParseResult, node: tree_sitter::Node<'_>) -> Span {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if FUNCTION_KINDS.contains(&parent.kind()) {
            let range = parent.byte_range();
            return Span::new(range.start, range.len());
        }
        current = parent;
    }
    Span::new(0, parse.source().len())
}

fn collect_occurrences(
    parse: &ParseResult,
    node: tree_sitter::Node<'_>,
    scope: Span,
    name: &str,
    found: &mut Vec<Span>,
) {
    let range = node.byte_range();
    if range.end <= scope.start || range.start >= scope.end() {
        return;
    }
    if node.kind() == "identifier" && parse.node_text(node) == name {
        found.push(Span::new(range.start, range.len()));
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_occurrences(parse, child, scope, name, found);
    }
}
