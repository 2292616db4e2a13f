//! Pass that moves stray import declarations to the top of the file.

use mender_core::{EditSet, TextEdit};
use mender_syntax::{ImportDecl, imports, needs_hoist};

use crate::error::EngineError;

use super::{CodemodPass, PassContext};

/// Hoists every import declaration to offset 0 when any of them follows a
/// non-import statement.
///
/// The whole move is one group: a deletion per declaration plus a single
/// insertion carrying the declarations in their original relative order.
/// Files whose imports already form an uninterrupted leading run are left
/// untouched, which is what makes the pass idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoistImports;

impl CodemodPass for HoistImports {
    fn name(&self) -> &'static str {
        "hoist-imports"
    }

    fn run(&self, ctx: &PassContext<'_>) -> Result<EditSet, EngineError> {
        let mut set = EditSet::new();
        if !needs_hoist(ctx.parse()) {
            return Ok(set);
        }

        let decls = imports(ctx.parse());
        if decls.is_empty() {
            return Ok(set);
        }
        let block: String = decls
            .iter()
            .map(ImportDecl::text)
            .collect::<Vec<_>>()
            .join("\n");

        let mut group = Vec::with_capacity(decls.len() + 1);
        group.push(TextEdit::insert_at(0, format!("{block}\n")));
        for decl in &decls {
            group.push(TextEdit::delete(decl.span()));
        }
        set.push_group(group);
        Ok(set)
    }
}
