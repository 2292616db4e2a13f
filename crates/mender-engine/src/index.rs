//! Cross-file symbol presence index.
//!
//! Built once during collection, before any per-file work starts, and read
//! concurrently afterwards. The missing-import pass consults it to decide
//! which target files reference a required symbol at all. Membership is a
//! literal substring test over the file text, which can over-match on
//! identifiers that contain the symbol as a substring; an exact
//! implementation would use the parsed identifier-reference list instead.

use std::collections::{BTreeMap, BTreeSet};

use camino::{Utf8Path, Utf8PathBuf};

use crate::plan::Plan;

/// Which required symbols each target file's text mentions.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    present: BTreeMap<Utf8PathBuf, BTreeSet<String>>,
}

impl SymbolIndex {
    /// Indexes the given file contents against the plan's required imports.
    ///
    /// `contents` maps root-relative paths to file text. Only files with a
    /// required-imports entry are indexed; the rest cannot receive an
    /// insertion anyway.
    #[must_use]
    pub fn build<'a>(
        plan: &Plan,
        contents: impl IntoIterator<Item = (&'a Utf8Path, &'a str)>,
    ) -> Self {
        let mut present: BTreeMap<Utf8PathBuf, BTreeSet<String>> = BTreeMap::new();
        for (path, text) in contents {
            let Some(requests) = plan.required_imports().get(path) else {
                continue;
            };
            let mentioned: BTreeSet<String> = requests
                .iter()
                .filter(|request| text.contains(&request.symbol))
                .map(|request| request.symbol.clone())
                .collect();
            if !mentioned.is_empty() {
                present.insert(path.to_owned(), mentioned);
            }
        }
        Self { present }
    }

    /// Whether `file`'s text mentions `symbol`.
    #[must_use]
    pub fn mentions(&self, file: &Utf8Path, symbol: &str) -> bool {
        self.present
            .get(file)
            .is_some_and(|symbols| symbols.contains(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_requiring_x() -> Plan {
        serde_json::from_str(
            r#"{
                "requiredImports": {
                    "src/app.tsx": [{"symbol": "X", "fromFile": "src/components/X.ts"}]
                }
            }"#,
        )
        .expect("plan")
    }

    #[test]
    fn indexes_only_files_with_required_imports() {
        let plan = plan_requiring_x();
        let index = SymbolIndex::build(
            &plan,
            [
                (Utf8Path::new("src/app.tsx"), "render(<X/>);"),
                (Utf8Path::new("src/other.tsx"), "render(<X/>);"),
            ],
        );
        assert!(index.mentions(Utf8Path::new("src/app.tsx"), "X"));
        assert!(!index.mentions(Utf8Path::new("src/other.tsx"), "X"));
    }

    #[test]
    fn absent_symbols_are_not_mentioned() {
        let plan = plan_requiring_x();
        let index = SymbolIndex::build(&plan, [(Utf8Path::new("src/app.tsx"), "render(null);")]);
        assert!(!index.mentions(Utf8Path::new("src/app.tsx"), "X"));
    }
}
