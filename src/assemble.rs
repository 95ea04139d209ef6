//! Concept assembly: one concept → one HTML page on disk.
//!
//! Atoms are rendered strictly in order, each wrapped with its title and
//! instructor notes, and collected into a page buffer. Only after the last
//! atom succeeds is the page written, so a failing atom leaves no file for
//! its concept. The write itself goes through a temporary file that is
//! persisted over `<prefix>. <title>.html`, which makes re-rendering into the
//! same target safe.

use crate::atom::{self, AtomContext, AtomError};
use crate::config::MediaConfig;
use crate::media::MediaFetcher;
use crate::naming::{filenamify, ordinal_prefix};
use crate::templates;
use crate::types::Concept;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

/// Lesson pages live one level below the archive root, next to `assets/`.
pub const ASSET_PREFIX: &str = "../assets";

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("atom {index} ({semantic_type}) failed: {source}")]
    Atom {
        index: usize,
        semantic_type: String,
        source: AtomError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-lesson settings shared by every concept of the lesson.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Lesson directory in the archive.
    pub source_dir: &'a Path,
    /// Lesson directory in the output.
    pub lesson_dir: &'a Path,
    pub sidebar_html: &'a str,
    pub fetcher: &'a dyn MediaFetcher,
    pub media: &'a MediaConfig,
}

/// `<prefix>. <filenamify(title)>.html`
pub fn concept_file_name(ordinal: usize, title: &str) -> String {
    format!("{}. {}.html", ordinal_prefix(ordinal), filenamify(title))
}

/// Render `concept` and write it as the `ordinal`-th page of the lesson.
///
/// Returns the path of the written page.
pub fn assemble(
    concept: &Concept,
    ordinal: usize,
    ctx: &RenderContext<'_>,
) -> Result<PathBuf, AssembleError> {
    let prefix = ordinal_prefix(ordinal);
    let mut content = String::new();
    debug!(concept = %concept.title, lesson = %ctx.source_dir.display(), "assembling concept");

    for (index, atom) in concept.atoms.iter().enumerate() {
        let atom_ctx = AtomContext {
            lesson_dir: ctx.lesson_dir,
            prefix: &prefix,
            index,
            fetcher: ctx.fetcher,
            media: ctx.media,
        };
        let fragment = atom::render(atom, &atom_ctx).map_err(|source| AssembleError::Atom {
            index,
            semantic_type: atom.semantic_type.clone(),
            source,
        })?;
        let wrapped = templates::atom_wrapper(
            atom.title.as_deref(),
            atom.instructor_notes.as_deref(),
            &fragment,
        );
        content.push_str(&wrapped.into_string());
    }

    let title = format!("{prefix}. {}", concept.title);
    let html = templates::page(&title, ctx.sidebar_html, &content, ASSET_PREFIX).into_string();

    let path = ctx.lesson_dir.join(concept_file_name(ordinal, &concept.title));
    write_atomic(&path, html.as_bytes())?;
    info!(file = %path.display(), atoms = concept.atoms.len(), "wrote concept page");
    Ok(path)
}

/// Write `contents` to `path` via a temporary file in the same directory.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.persist(path)?;
    Ok(())
}
