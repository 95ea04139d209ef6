//! Lesson loading and rendering.
//!
//! A lesson directory holds its concepts in one of two layouts:
//!
//! ```text
//! Lesson 3 Intro/                 Lesson 3 Intro/
//! └── data.json   (lesson doc)    ├── 01. Welcome.json   (concept)
//!                                 ├── 02. Setup.json     (concept)
//!                                 └── 10. Wrap up.json   (concept)
//! ```
//!
//! A `data.json` lesson document wins when present. Otherwise every `*.json`
//! file is one concept, taken in natural name order.
//!
//! Rendering a lesson builds the sidebar once (lesson title plus a link per
//! concept page) and assembles the concepts in order, each with its 0-based
//! position as ordinal.

use crate::assemble::{self, AssembleError, RenderContext, concept_file_name};
use crate::config::MediaConfig;
use crate::media::{MediaFetcher, encode_path_segment};
use crate::templates::{self, SidebarLink};
use crate::tree::DirectoryNode;
use crate::types::{Concept, LessonDocument};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const LESSON_DOCUMENT: &str = "data.json";

#[derive(Error, Debug)]
pub enum LessonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// A lesson's concepts, read from its directory.
#[derive(Debug)]
pub struct Lesson {
    pub title: String,
    pub concepts: Vec<Concept>,
}

impl Lesson {
    /// File name of the first concept page, if the lesson has any.
    pub fn first_page(&self) -> Option<String> {
        self.concepts
            .first()
            .map(|concept| concept_file_name(0, &concept.title))
    }
}

/// Read the concepts of a lesson directory.
pub fn load_lesson(dir: &DirectoryNode) -> Result<Lesson, LessonError> {
    if let Some(doc) = dir.child(LESSON_DOCUMENT).filter(|n| n.is_file()) {
        let document: LessonDocument = read_json(&doc.path)?;
        let title = if document.title.trim().is_empty() {
            dir.name.clone()
        } else {
            document.title
        };
        return Ok(Lesson {
            title,
            concepts: document.concepts,
        });
    }

    let concepts = dir
        .files()
        .filter(|f| is_json(&f.name))
        .map(|f| read_json::<Concept>(&f.path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Lesson {
        title: dir.name.clone(),
        concepts,
    })
}

/// Sidebar links, one per concept page, in page order.
pub fn sidebar_links(concepts: &[Concept]) -> Vec<SidebarLink> {
    concepts
        .iter()
        .enumerate()
        .map(|(ordinal, concept)| SidebarLink {
            title: format!("{}. {}", crate::naming::ordinal_prefix(ordinal), concept.title),
            href: encode_path_segment(&concept_file_name(ordinal, &concept.title)),
        })
        .collect()
}

/// Render every concept of the lesson in `dir` into `lesson_dir`.
///
/// Returns the written pages in order; empty when the lesson has no concepts.
pub fn render_lesson(
    dir: &DirectoryNode,
    lesson_dir: &Path,
    fetcher: &dyn MediaFetcher,
    media: &MediaConfig,
) -> Result<Vec<PathBuf>, LessonError> {
    let lesson = load_lesson(dir)?;
    if lesson.concepts.is_empty() {
        warn!(lesson = %dir.path.display(), "lesson has no concepts, skipping");
        return Ok(Vec::new());
    }

    info!(lesson = %lesson.title, concepts = lesson.concepts.len(), "rendering lesson");
    let sidebar_html = templates::sidebar(&lesson.title, &sidebar_links(&lesson.concepts)).into_string();
    let ctx = RenderContext {
        source_dir: &dir.path,
        lesson_dir,
        sidebar_html: &sidebar_html,
        fetcher,
        media,
    };

    let mut pages = Vec::with_capacity(lesson.concepts.len());
    for (ordinal, concept) in lesson.concepts.iter().enumerate() {
        pages.push(assemble::assemble(concept, ordinal, &ctx)?);
    }
    Ok(pages)
}

fn is_json(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LessonError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| LessonError::Json {
        path: path.to_path_buf(),
        source,
    })
}
