//! Workspace file discovery for bare invocations.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use crate::errors::CliError;

const SOURCE_EXTENSIONS: [&str; 2] = ["ts", "tsx"];

/// Walks the workspace for TypeScript sources, honouring ignore files.
///
/// Hidden directories, `.gitignore` entries, and `node_modules` are
/// skipped. When `globs` is non-empty, only matching paths are returned.
/// Results are root-relative and sorted for deterministic runs.
///
/// # Errors
///
/// Returns [`CliError::Discovery`] when a glob pattern is invalid or the
/// walk fails.
pub fn discover(root: &Utf8Path, globs: &[String]) -> Result<Vec<Utf8PathBuf>, CliError> {
    let mut builder = WalkBuilder::new(root);
    builder.hidden(true).follow_links(false);
    builder.filter_entry(|entry| entry.file_name() != "node_modules");

    if !globs.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for glob in globs {
            overrides
                .add(glob)
                .map_err(|e| CliError::Discovery(e.to_string()))?;
        }
        let built = overrides
            .build()
            .map_err(|e| CliError::Discovery(e.to_string()))?;
        builder.overrides(built);
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.map_err(|e| CliError::Discovery(e.to_string()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Some(path) = Utf8Path::from_path(entry.path()) else {
            continue;
        };
        if !path
            .extension()
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
        {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        files.push(relative.to_owned());
    }
    files.sort();
    Ok(files)
}
