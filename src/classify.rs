//! Course vs. Nanodegree classification.
//!
//! An archive is renderable only if its root holds a `data.json` manifest. The
//! manifest is the source of truth for the archive type:
//!
//! 1. `semantic_type`: `"Degree"` / `"Nanodegree"` → Nanodegree, `"Course"` → Course
//! 2. manifest shape: a `parts` array → Nanodegree, a `lessons` array → Course
//! 3. folder names: any `Part <n>` directory at the root → Nanodegree, else Course
//!
//! The first rule that yields an answer wins, so a manifest that declares
//! `"Course"` stays a Course even if a stray `Part 1` folder sits next to it.

use crate::naming::{TagKind, hierarchy_tag};
use crate::tree::DirectoryNode;
use crate::types::ArchiveManifest;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const MANIFEST_FILENAME: &str = "data.json";

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseType {
    Course,
    Nanodegree,
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseType::Course => write!(f, "course"),
            CourseType::Nanodegree => write!(f, "Nanodegree"),
        }
    }
}

/// Read and parse the root manifest, if the archive has one.
pub fn read_manifest(root: &DirectoryNode) -> Result<Option<ArchiveManifest>, ClassifyError> {
    let Some(node) = root.child(MANIFEST_FILENAME).filter(|n| n.is_file()) else {
        return Ok(None);
    };
    let content = fs::read_to_string(&node.path)?;
    let manifest = serde_json::from_str(&content).map_err(|source| ClassifyError::Manifest {
        path: node.path.clone(),
        source,
    })?;
    Ok(Some(manifest))
}

/// Decide the archive type. `Ok(None)` means "not an archive": skip it.
pub fn classify(root: &DirectoryNode) -> Result<Option<CourseType>, ClassifyError> {
    Ok(read_manifest(root)?.map(|manifest| classify_manifest(&manifest, root)))
}

/// Apply the classification rules to an already-parsed manifest.
pub fn classify_manifest(manifest: &ArchiveManifest, root: &DirectoryNode) -> CourseType {
    if let Some(declared) = manifest.semantic_type.as_deref().and_then(declared_type) {
        return declared;
    }
    if manifest.parts.is_some() {
        return CourseType::Nanodegree;
    }
    if manifest.lessons.is_some() {
        return CourseType::Course;
    }
    let has_parts = root
        .subdirs()
        .any(|d| hierarchy_tag(&d.name, TagKind::Part).is_some());
    if has_parts {
        CourseType::Nanodegree
    } else {
        CourseType::Course
    }
}

fn declared_type(semantic_type: &str) -> Option<CourseType> {
    match semantic_type.to_ascii_lowercase().as_str() {
        "degree" | "nanodegree" => Some(CourseType::Nanodegree),
        "course" => Some(CourseType::Course),
        _ => None,
    }
}
