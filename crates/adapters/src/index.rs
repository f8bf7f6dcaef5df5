// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive file index over a sweep root.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists files under a root that match a predicate.
///
/// Results reflect the filesystem as of the last [`update`](Self::update).
pub trait DirectoryIndex: Send + Sync {
    fn root(&self) -> &Path;

    /// Re-scan the root.
    fn update(&mut self);

    /// Matching files, sorted by path.
    fn list(&self) -> &[PathBuf];
}

/// [`DirectoryIndex`] backed by a `walkdir` traversal.
pub struct WalkDirIndex {
    root: PathBuf,
    predicate: fn(&Path) -> bool,
    entries: Vec<PathBuf>,
}

impl WalkDirIndex {
    /// Create an index; the root is scanned on the first `update()`.
    pub fn new(root: impl Into<PathBuf>, predicate: fn(&Path) -> bool) -> Self {
        Self { root: root.into(), predicate, entries: Vec::new() }
    }
}

impl DirectoryIndex for WalkDirIndex {
    fn root(&self) -> &Path {
        &self.root
    }

    fn update(&mut self) {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            match entry {
                Ok(entry) if entry.file_type().is_file() && (self.predicate)(entry.path()) => {
                    entries.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        root = %self.root.display(),
                        error = %e,
                        "skipping unreadable entry"
                    );
                }
            }
        }
        entries.sort();
        self.entries = entries;
    }

    fn list(&self) -> &[PathBuf] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn is_marker(path: &Path) -> bool {
        path.file_name().is_some_and(|n| n == "marker")
    }

    #[test]
    fn lists_matching_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["b", "a", "a/nested"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("marker"), "").unwrap();
        }
        fs::write(dir.path().join("a/other"), "").unwrap();

        let mut index = WalkDirIndex::new(dir.path(), is_marker);
        assert!(index.list().is_empty());
        index.update();

        let found: Vec<_> = index
            .list()
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            found,
            vec![
                PathBuf::from("a/marker"),
                PathBuf::from("a/nested/marker"),
                PathBuf::from("b/marker"),
            ]
        );
    }

    #[test]
    fn update_sees_new_and_removed_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = WalkDirIndex::new(dir.path(), is_marker);

        fs::write(dir.path().join("marker"), "").unwrap();
        index.update();
        assert_eq!(index.list().len(), 1);

        fs::remove_file(dir.path().join("marker")).unwrap();
        index.update();
        assert!(index.list().is_empty());
    }

    #[test]
    fn missing_root_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = WalkDirIndex::new(dir.path().join("absent"), is_marker);
        index.update();
        assert!(index.list().is_empty());
        assert_eq!(index.root(), dir.path().join("absent"));
    }
}
