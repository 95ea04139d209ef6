//! Read-only snapshot of the archive directory tree.
//!
//! The pipeline scans the source archive exactly once, up front, into a tree of
//! [`DirectoryNode`]s. Everything downstream (classification, traversal, the
//! summary page outline) works from this snapshot; nothing re-reads directory
//! listings mid-run, so a render always sees one consistent view of the tree.
//!
//! Children are sorted in natural order (see [`crate::naming::natural_cmp`]).
//! Hidden entries (leading `.`) are left out, they are downloader bookkeeping.

use crate::naming::natural_cmp;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// A file or directory in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub name: String,
    /// Absolute path of the entry.
    pub path: PathBuf,
    pub kind: NodeKind,
    /// Ordered children; always empty for files.
    pub children: Vec<DirectoryNode>,
}

impl DirectoryNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Direct child with exactly this name.
    pub fn child(&self, name: &str) -> Option<&DirectoryNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children that are directories, in order.
    pub fn subdirs(&self) -> impl Iterator<Item = &DirectoryNode> {
        self.children.iter().filter(|c| c.is_dir())
    }

    /// Direct children that are files, in order.
    pub fn files(&self) -> impl Iterator<Item = &DirectoryNode> {
        self.children.iter().filter(|c| c.is_file())
    }
}

/// Scan `root` recursively into a [`DirectoryNode`] tree.
///
/// `root` must be a directory; the returned paths are absolute. Symlinks are
/// followed, except into a directory that is already being scanned higher up.
/// Entries whose metadata cannot be read (dangling links) are left out.
pub fn scan(root: &Path) -> io::Result<DirectoryNode> {
    let root = std::path::absolute(root)?;
    if !fs::metadata(&root)?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("{} is not a directory", root.display()),
        ));
    }
    let mut ancestors = vec![fs::canonicalize(&root)?];
    scan_dir(&root, &mut ancestors)
}

/// `ancestors` holds the canonical paths of `path` and every directory above it.
fn scan_dir(path: &Path, ancestors: &mut Vec<PathBuf>) -> io::Result<DirectoryNode> {
    let mut children = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let child_path = entry.path();
        let metadata = match fs::metadata(&child_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(path = %child_path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if metadata.is_dir() {
            let canonical = fs::canonicalize(&child_path)?;
            if ancestors.contains(&canonical) {
                debug!(path = %child_path.display(), "skipping symlink back into a parent directory");
                continue;
            }
            ancestors.push(canonical);
            let node = scan_dir(&child_path, ancestors);
            ancestors.pop();
            children.push(node?);
        } else {
            children.push(DirectoryNode {
                name,
                path: child_path,
                kind: NodeKind::File,
                children: Vec::new(),
            });
        }
    }
    children.sort_by(|a, b| natural_cmp(&a.name, &b.name));

    Ok(DirectoryNode {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        kind: NodeKind::Directory,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn scan_builds_nested_tree() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Part 1/Module 1")).unwrap();
        fs::write(tmp.path().join("data.json"), "{}").unwrap();

        let tree = scan(tmp.path()).unwrap();
        assert!(tree.is_dir());
        assert!(tree.child("data.json").unwrap().is_file());
        let part = tree.child("Part 1").unwrap();
        assert!(part.is_dir());
        assert_eq!(part.children[0].name, "Module 1");
    }

    #[test]
    fn scan_orders_children_naturally() {
        let tmp = TempDir::new().unwrap();
        for name in ["Part 10", "Part 2", "Part 1"] {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }
        let tree = scan(tmp.path()).unwrap();
        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Part 1", "Part 2", "Part 10"]);
    }

    #[test]
    fn scan_skips_hidden_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".DS_Store"), "").unwrap();
        fs::create_dir(tmp.path().join(".cache")).unwrap();
        fs::write(tmp.path().join("data.json"), "{}").unwrap();

        let tree = scan(tmp.path()).unwrap();
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn scan_paths_are_absolute() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("Lesson")).unwrap();
        let tree = scan(tmp.path()).unwrap();
        assert!(tree.path.is_absolute());
        assert!(tree.children[0].path.is_absolute());
    }

    #[test]
    fn scan_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("data.json");
        fs::write(&file, "{}").unwrap();
        assert!(scan(&file).is_err());
    }

    #[test]
    fn scan_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(scan(&tmp.path().join("nope")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn scan_skips_dangling_symlink() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("Lesson")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("broken")).unwrap();

        let tree = scan(tmp.path()).unwrap();
        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Lesson"]);
    }

    #[cfg(unix)]
    #[test]
    fn scan_does_not_follow_symlink_loops() {
        let tmp = TempDir::new().unwrap();
        let lesson = tmp.path().join("Lesson");
        fs::create_dir(&lesson).unwrap();
        std::os::unix::fs::symlink(tmp.path(), lesson.join("up")).unwrap();

        let tree = scan(tmp.path()).unwrap();
        let lesson = tree.child("Lesson").unwrap();
        assert!(lesson.children.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn scan_follows_symlinked_lesson() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        fs::create_dir_all(real.join("Lesson")).unwrap();
        fs::write(real.join("Lesson/c.json"), "{}").unwrap();
        let archive = tmp.path().join("archive");
        fs::create_dir(&archive).unwrap();
        std::os::unix::fs::symlink(real.join("Lesson"), archive.join("Lesson")).unwrap();

        let tree = scan(&archive).unwrap();
        assert!(tree.child("Lesson").unwrap().child("c.json").is_some());
    }

    #[test]
    fn subdirs_and_files_filter() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("a")).unwrap();
        fs::write(tmp.path().join("b.json"), "{}").unwrap();
        let tree = scan(tmp.path()).unwrap();
        assert_eq!(tree.subdirs().count(), 1);
        assert_eq!(tree.files().count(), 1);
    }
}
