//! Pass that rewrites extensionless relative specifiers to a real file.

use camino::{Utf8Path, Utf8PathBuf};

use mender_core::{EditSet, TextEdit};
use mender_syntax::imports;

use crate::error::EngineError;
use crate::probe::{FileProbe, normalise};

use super::{CodemodPass, PassContext};

const RESOLVED_EXTENSIONS: [&str; 8] = ["ts", "tsx", "js", "jsx", "mts", "cts", "mjs", "cjs"];

/// Probe order mirrors the module resolver: TSX first, plain JS last.
const PROBE_SUFFIXES: [&str; 4] = [".tsx", ".ts", ".jsx", ".js"];

/// Appends the right extension to relative specifiers that lack one.
///
/// Runtimes with strict ESM resolution refuse `./util` even when
/// `./util.ts` exists next to the importer. For each relative specifier
/// without a recognised extension, the candidate suffixes are probed
/// against the filesystem seam and the first hit rewrites the specifier in
/// place. Specifiers that resolve to nothing are left alone for the
/// analysis service to report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormaliseImportPaths;

impl CodemodPass for NormaliseImportPaths {
    fn name(&self) -> &'static str {
        "normalise-import-paths"
    }

    fn run(&self, ctx: &PassContext<'_>) -> Result<EditSet, EngineError> {
        let importer_dir = ctx.path().parent().unwrap_or(Utf8Path::new(""));
        let mut set = EditSet::new();
        for decl in imports(ctx.parse()) {
            let specifier = decl.specifier();
            if !specifier.starts_with('.') || has_resolved_extension(specifier) {
                continue;
            }
            let base = normalise(&importer_dir.join(specifier));
            if let Some(suffix) = first_existing_suffix(ctx.probe(), &base) {
                set.push(TextEdit::replace(
                    decl.specifier_span(),
                    format!("{specifier}{suffix}"),
                ));
            }
        }
        Ok(set)
    }
}

fn has_resolved_extension(specifier: &str) -> bool {
    Utf8Path::new(specifier)
        .extension()
        .is_some_and(|ext| RESOLVED_EXTENSIONS.contains(&ext))
}

fn first_existing_suffix(probe: &dyn FileProbe, base: &Utf8Path) -> Option<&'static str> {
    PROBE_SUFFIXES.into_iter().find(|suffix| {
        let candidate = Utf8PathBuf::from(format!("{base}{suffix}"));
        probe.exists(&candidate)
    })
}
