//! Shared test utilities for the coursepress test suite.
//!
//! Builders for archive fixtures (atoms, concepts, lesson directories) and a
//! couple of lookups over rendered output trees.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! build_archive(tmp.path(), &[
//!     ("data.json", r#"{"title":"Course"}"#),
//!     ("Lesson A/c1.json", &concept_json("Intro", &[])),
//! ]);
//! assert_eq!(list_files(tmp.path()), vec!["Lesson A/c1.json", "data.json"]);
//! ```

use std::fs;
use std::path::Path;

use crate::types::{Atom, Concept};

// =========================================================================
// Model builders
// =========================================================================

/// Parse an atom from JSON. Panics on invalid JSON.
pub fn atom(json: &str) -> Atom {
    serde_json::from_str(json).unwrap_or_else(|e| panic!("invalid atom fixture {json}: {e}"))
}

/// A concept with the given atoms (each an atom JSON object).
pub fn concept(title: &str, atoms: &[&str]) -> Concept {
    serde_json::from_str(&concept_json(title, atoms)).unwrap()
}

/// Concept document JSON, as it appears in a lesson directory.
pub fn concept_json(title: &str, atoms: &[&str]) -> String {
    format!(
        r#"{{"title":{},"atoms":[{}]}}"#,
        serde_json::to_string(title).unwrap(),
        atoms.join(",")
    )
}

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write `dir/name`, creating `dir` as needed.
pub fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

/// Write every `(relative path, contents)` pair below `root`.
pub fn build_archive(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        let parent = path.parent().unwrap();
        fs::create_dir_all(parent).unwrap();
        fs::write(&path, contents).unwrap();
    }
}

/// All files below `root` as sorted `/`-separated relative paths.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect_files(root, root, &mut files);
    files.sort();
    files
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(root, &path, files);
        } else {
            let rel = path.strip_prefix(root).unwrap();
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect();
            files.push(parts.join("/"));
        }
    }
}
