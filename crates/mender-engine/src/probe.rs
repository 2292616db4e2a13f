//! Filesystem existence probing behind a seam.
//!
//! The import-path normalisation pass probes candidate files for existence.
//! Production runs use [`FsProbe`]; tests and the editor boundary use
//! [`MemoryProbe`] so no real filesystem is needed.

use std::collections::BTreeSet;

use camino::{Utf8Path, Utf8PathBuf};

/// Answers "does this file exist" queries for the passes.
pub trait FileProbe: Send + Sync {
    /// Whether a regular file exists at `path`.
    fn exists(&self, path: &Utf8Path) -> bool;
}

/// Probe backed by the real filesystem, anchored at a workspace root.
///
/// Passes work with root-relative paths; the probe joins them onto the
/// root before asking the filesystem.
#[derive(Debug, Clone)]
pub struct FsProbe {
    root: Utf8PathBuf,
}

impl FsProbe {
    /// Creates a probe resolving relative paths against `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileProbe for FsProbe {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.root.join(path).is_file()
    }
}

/// Probe backed by an in-memory path set.
///
/// Paths are normalised lexically on insert and lookup so `a/./b` and
/// `a/c/../b` both match a stored `a/b`.
#[derive(Debug, Clone, Default)]
pub struct MemoryProbe {
    paths: BTreeSet<Utf8PathBuf>,
}

impl MemoryProbe {
    /// Creates a probe knowing the given paths.
    #[must_use]
    pub fn new(paths: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().map(|p| normalise(&p)).collect(),
        }
    }

    /// Registers one more known path.
    pub fn insert(&mut self, path: Utf8PathBuf) {
        self.paths.insert(normalise(&path));
    }
}

impl FileProbe for MemoryProbe {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.paths.contains(&normalise(path))
    }
}

/// Resolves `.` and `..` components lexically, without touching the
/// filesystem.
#[must_use]
pub fn normalise(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            camino::Utf8Component::CurDir => {}
            camino::Utf8Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("src/./util.ts", "src/util.ts")]
    #[case("src/components/../util.ts", "src/util.ts")]
    #[case("../shared/x.ts", "../shared/x.ts")]
    fn normalise_resolves_dot_components(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalise(Utf8Path::new(input)), Utf8PathBuf::from(expected));
    }

    #[test]
    fn memory_probe_matches_normalised_paths() {
        let probe = MemoryProbe::new([Utf8PathBuf::from("src/util.ts")]);
        assert!(probe.exists(Utf8Path::new("src/components/../util.ts")));
        assert!(!probe.exists(Utf8Path::new("src/util.tsx")));
    }
}
