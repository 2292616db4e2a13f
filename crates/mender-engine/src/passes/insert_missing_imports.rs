//! Pass that inserts configured named imports where they are missing.

use camino::{Utf8Path, Utf8PathBuf};

use mender_core::{EditSet, TextEdit};
use mender_syntax::{import_insertion_offset, imports};

use crate::error::EngineError;

use super::{CodemodPass, PassContext};

const STRIPPABLE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// Inserts `import { symbol } from "..."` lines from the plan's
/// required-imports map.
///
/// A symbol already bound by any existing import is skipped, wherever it
/// is imported from; inserting a second binding of the same name would
/// trade one diagnostic for a duplicate-identifier error. New imports land
/// after the last leading import declaration, or at offset 0 when the file
/// has none. One logical unit per inserted line.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertMissingImports;

impl CodemodPass for InsertMissingImports {
    fn name(&self) -> &'static str {
        "insert-missing-imports"
    }

    fn run(&self, ctx: &PassContext<'_>) -> Result<EditSet, EngineError> {
        let Some(requests) = ctx.plan().required_imports().get(ctx.path()) else {
            return Ok(EditSet::new());
        };

        let existing = imports(ctx.parse());
        let offset = import_insertion_offset(ctx.parse());
        let mut set = EditSet::new();
        for request in requests {
            if !ctx.index().mentions(ctx.path(), &request.symbol) {
                continue;
            }
            if existing.iter().any(|decl| decl.binds(&request.symbol)) {
                continue;
            }
            let Some(specifier) = relative_specifier(ctx.path(), &request.from_file) else {
                continue;
            };
            set.push(TextEdit::insert_at(
                offset,
                format!("import {{ {} }} from \"{specifier}\";\n", request.symbol),
            ));
        }
        Ok(set)
    }
}

/// Path of `from_file` relative to the target's directory, with a known
/// source extension stripped and a `./` prefix when the result does not
/// already start with `.`.
fn relative_specifier(target: &Utf8Path, from_file: &Utf8Path) -> Option<String> {
    let target_dir = target.parent().unwrap_or(Utf8Path::new(""));
    let relative = pathdiff::diff_utf8_paths(from_file, target_dir)?;
    let stripped: Utf8PathBuf = if relative
        .extension()
        .is_some_and(|ext| STRIPPABLE_EXTENSIONS.contains(&ext))
    {
        relative.with_extension("")
    } else {
        relative
    };
    let text = stripped.as_str();
    if text.starts_with('.') {
        Some(text.to_owned())
    } else {
        Some(format!("./{text}"))
    }
}
