//! Pass that gives JSX files a default React import.

use mender_core::{EditSet, TextEdit};
use mender_syntax::imports;

use crate::error::EngineError;

use super::{CodemodPass, PassContext};

/// Inserts `import React from 'react';` into files that use JSX without
/// importing `react` in any form.
///
/// Classic JSX transforms compile elements to `React.createElement`, so a
/// JSX file with no `react` import fails at type-check even when nothing
/// references `React` by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactImport;

impl CodemodPass for ReactImport {
    fn name(&self) -> &'static str {
        "react-import"
    }

    fn run(&self, ctx: &PassContext<'_>) -> Result<EditSet, EngineError> {
        let mut set = EditSet::new();
        if !ctx.parse().contains_jsx() {
            return Ok(set);
        }
        let already_imported = imports(ctx.parse())
            .iter()
            .any(|decl| decl.specifier() == "react");
        if !already_imported {
            set.push(TextEdit::insert_at(0, "import React from 'react';\n"));
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::testing::{apply_pass, run_pass};
    use crate::plan::Plan;
    use crate::probe::MemoryProbe;

    #[test]
    fn jsx_without_react_gains_the_import() {
        let plan = Plan::default();
        let probe = MemoryProbe::default();
        let fixed = apply_pass(
            &ReactImport,
            "app.tsx",
            "export const App = () => <div/>;\n",
            &plan,
            &probe,
        );
        assert_eq!(
            fixed,
            "import React from 'react';\nexport const App = () => <div/>;\n"
        );
    }

    #[test]
    fn any_react_import_suppresses_insertion() {
        let plan = Plan::default();
        let probe = MemoryProbe::default();
        let set = run_pass(
            &ReactImport,
            "app.tsx",
            "import { useState } from 'react';\nexport const App = () => <div/>;\n",
            &plan,
            &probe,
        );
        assert!(set.is_empty());
    }

    #[test]
    fn files_without_jsx_are_untouched() {
        let plan = Plan::default();
        let probe = MemoryProbe::default();
        let set = run_pass(&ReactImport, "app.ts", "export const n = 1;\n", &plan, &probe);
        assert!(set.is_empty());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let plan = Plan::default();
        let probe = MemoryProbe::default();
        let source = "export const App = () => <div/>;\n";
        let fixed = apply_pass(&ReactImport, "app.tsx", source, &plan, &probe);
        let again = run_pass(&ReactImport, "app.tsx", &fixed, &plan, &probe);
        assert!(again.is_empty());
    }
}
