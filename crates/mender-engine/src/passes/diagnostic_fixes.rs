//! Pass that carries ledger-admitted analysis fixes into the merge.

use mender_core::EditSet;

use crate::error::EngineError;

use super::{CodemodPass, PassContext};

/// Applies the first fix candidate per allow-listed diagnostic.
///
/// Candidate selection and cross-file admission happen during collection;
/// by the time this pass runs, the context already carries the edits that
/// survived the ledger for this file. Each admitted candidate counts as
/// one logical unit regardless of how many text edits it contributed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticFixes;

impl CodemodPass for DiagnosticFixes {
    fn name(&self) -> &'static str {
        "diagnostic-fixes"
    }

    fn run(&self, ctx: &PassContext<'_>) -> Result<EditSet, EngineError> {
        let mut set = EditSet::new();
        for group in ctx.admitted_fixes() {
            set.push_group(group.clone());
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8Path;
    use mender_core::{Span, TextEdit};

    use super::*;
    use crate::index::SymbolIndex;
    use crate::passes::testing::parse;
    use crate::plan::Plan;
    use crate::probe::MemoryProbe;

    #[test]
    fn groups_count_one_unit_each() {
        let parsed = parse("const a = 1;\n");
        let plan = Plan::default();
        let probe = MemoryProbe::default();
        let index = SymbolIndex::default();
        let admitted = vec![
            vec![TextEdit::replace(Span::new(6, 1), "b")],
            vec![
                TextEdit::insert_at(0, "import x;\n"),
                TextEdit::insert_at(0, "import y;\n"),
            ],
        ];
        let ctx = PassContext::new(
            Utf8Path::new("a.ts"),
            &parsed,
            &plan,
            &probe,
            &index,
            &admitted,
        );

        let set = DiagnosticFixes.run(&ctx).expect("run");
        assert_eq!(set.len(), 3);
        assert_eq!(set.units(), 2);
    }

    #[test]
    fn no_admitted_fixes_yields_empty_set() {
        let parsed = parse("const a = 1;\n");
        let plan = Plan::default();
        let probe = MemoryProbe::default();
        let index = SymbolIndex::default();
        let ctx = PassContext::new(Utf8Path::new("a.ts"), &parsed, &plan, &probe, &index, &[]);
        assert!(DiagnosticFixes.run(&ctx).expect("run").is_empty());
    }
}
