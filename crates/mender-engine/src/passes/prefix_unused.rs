//! Pass that renames flagged unused bindings to their `_`-prefixed form.

use std::collections::BTreeSet;

use mender_core::{EditSet, Span, TextEdit};
use mender_syntax::{DeclaredName, declared_names, occurrences_in};

use crate::error::EngineError;

use super::{CodemodPass, PassContext};

/// Prefixes flagged unused names with `_` throughout their scope.
///
/// Every occurrence of the name within the declaration's scope is renamed
/// together so the declaration and its residual uses stay consistent.
/// Occurrences inside a nested scope that redeclares the name belong to
/// that inner declaration, which renames them as its own unit.
/// Names already starting with `_` are left alone, which is what makes the
/// pass idempotent. One logical unit per renamed declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixUnused;

impl CodemodPass for PrefixUnused {
    fn name(&self) -> &'static str {
        "prefix-unused"
    }

    fn run(&self, ctx: &PassContext<'_>) -> Result<EditSet, EngineError> {
        let flagged: BTreeSet<&str> = ctx
            .plan()
            .unused_names()
            .iter()
            .map(String::as_str)
            .filter(|name| !name.starts_with('_'))
            .collect();
        if flagged.is_empty() {
            return Ok(EditSet::new());
        }

        let declarations = declared_names(ctx.parse());
        let mut set = EditSet::new();
        // Same-scope redeclarations collect identical occurrences; claimed
        // spans keep one occurrence from being renamed twice.
        let mut claimed: BTreeSet<Span> = BTreeSet::new();
        for declaration in &declarations {
            if !flagged.contains(declaration.name()) {
                continue;
            }
            let shadows: Vec<Span> = declarations
                .iter()
                .filter(|other| {
                    other.name() == declaration.name()
                        && other.scope() != declaration.scope()
                        && declaration.scope().contains(&other.scope())
                })
                .map(DeclaredName::scope)
                .collect();
            let replacement = format!("_{}", declaration.name());
            let group: Vec<TextEdit> =
                occurrences_in(ctx.parse(), declaration.scope(), declaration.name())
                    .into_iter()
                    .filter(|span| !shadows.iter().any(|scope| scope.contains(span)))
                    .filter(|span| claimed.insert(*span))
                    .map(|span| TextEdit::replace(span, replacement.clone()))
                    .collect();
            set.push_group(group);
        }
        Ok(set)
    }
}
