//! The rendering pipeline.
//!
//! [`render`] turns one downloaded archive into a static site:
//!
//! ```text
//! 1. Preconditions   source ≠ target, target exists, source readable,
//!                    output root neither collides with nor nests in source
//! 2. Skip check      no root data.json → nothing to do
//! 3. Output root     target/<archive name>/ + assets/{css,js}
//! 4. Classify        Course or Nanodegree
//! 5. Summary         index.html (Nanodegree only)
//! 6. Walk            every lesson, every concept, in order
//! ```
//!
//! Every precondition is checked before anything is written. After that, the
//! first error anywhere below (a bad lesson document, a failed media fetch)
//! propagates out unchanged: pages already written stay, nothing is rolled
//! back and nothing is retried.
//!
//! ## Output Structure
//!
//! ```text
//! target/
//! └── <archive name>/
//!     ├── index.html                     # Nanodegree summary
//!     ├── assets/
//!     │   ├── css/style.css
//!     │   └── js/main.js
//!     └── Part 01-Module 01-Lesson 1 Intro/
//!         ├── 00. Welcome.html
//!         ├── 01. Setup.html
//!         ├── img/
//!         └── videos/
//! ```

use crate::assemble::write_atomic;
use crate::classify::{self, ClassifyError, CourseType};
use crate::config::{self, ConfigError, RenderConfig};
use crate::media::{self, MediaError, MediaFetcher};
use crate::naming::{filenamify, make_dir, sanitize_path};
use crate::summary;
use crate::tree;
use crate::walk::{self, WalkError, WalkReport};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::info;

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/main.js");

pub const ASSETS_DIR: &str = "assets";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Target directory must not be the same as the source directory: {0}")]
    SameSourceAndTarget(PathBuf),
    #[error("Target directory {0} doesn't exist. Please create it first")]
    TargetMissing(PathBuf),
    #[error("Source archive {path} is not a readable directory: {source}")]
    SourceUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(
        "Rendering into {0} would write into the archive's own folder. Please choose another target directory"
    )]
    OutputCollision(PathBuf),
    #[error("Output directory {output} lies inside the source archive {source_dir}")]
    OutputInsideSource { output: PathBuf, source_dir: PathBuf },
    #[error("Classification failed: {0}")]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
}

impl RenderError {
    /// Whether the render was refused before anything was written.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            RenderError::SameSourceAndTarget(_)
                | RenderError::TargetMissing(_)
                | RenderError::SourceUnreadable { .. }
                | RenderError::OutputCollision(_)
                | RenderError::OutputInsideSource { .. }
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: RenderConfig,
}

/// What a finished render did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderReport {
    /// The source has no `data.json`; nothing was written.
    Skipped { source: PathBuf },
    Rendered(RenderSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub archive_name: String,
    pub course_type: CourseType,
    pub output_root: PathBuf,
    /// `index.html`, for Nanodegrees.
    pub summary_page: Option<PathBuf>,
    pub walk: WalkReport,
}

/// Render the archive at `source` into `target/<archive name>/`.
///
/// Media is acquired as `options.config.media` says: downloaded over HTTP,
/// or linked remotely when downloads are off.
pub fn render(source: &Path, target: &Path, options: &RenderOptions) -> Result<RenderReport, RenderError> {
    options.config.validate()?;
    let fetcher = media::fetcher_for(&options.config.media)?;
    render_with_fetcher(source, target, options, fetcher.as_ref())
}

/// [`render`] with an explicit media fetcher.
pub fn render_with_fetcher(
    source: &Path,
    target: &Path,
    options: &RenderOptions,
    fetcher: &dyn MediaFetcher,
) -> Result<RenderReport, RenderError> {
    let source_path = normalize(source)?;
    let target_path = normalize(target)?;

    if source_path == target_path {
        return Err(RenderError::SameSourceAndTarget(target_path));
    }
    if !target_path.is_dir() {
        return Err(RenderError::TargetMissing(target_path));
    }
    let root = tree::scan(&source_path).map_err(|e| RenderError::SourceUnreadable {
        path: source_path.clone(),
        source: e,
    })?;

    let archive_name = root.name.clone();
    let would_be = target_path.join(&archive_name);
    if sanitize_path(&source_path.to_string_lossy()) == sanitize_path(&would_be.to_string_lossy()) {
        return Err(RenderError::OutputCollision(target_path));
    }
    let output_path = target_path.join(filenamify(&archive_name));
    if output_path.starts_with(&source_path) {
        return Err(RenderError::OutputInsideSource {
            output: output_path,
            source_dir: source_path,
        });
    }

    let Some(manifest) = classify::read_manifest(&root)? else {
        info!(
            source = %source_path.display(),
            "no data.json found, is this a downloaded course archive? Skipping"
        );
        return Ok(RenderReport::Skipped {
            source: source_path,
        });
    };

    let output_root = make_dir(&target_path, &archive_name)?;
    write_assets(&output_root, &options.config)?;

    let course_type = classify::classify_manifest(&manifest, &root);
    info!(archive = %archive_name, %course_type, "rendering archive");

    let summary_page = match course_type {
        CourseType::Nanodegree => Some(summary::write_summary(
            &manifest,
            &archive_name,
            &root,
            course_type,
            &output_root,
        )?),
        CourseType::Course => None,
    };

    let walk = walk::walk(&root, course_type, &output_root, fetcher, &options.config.media)?;

    info!(
        archive = %archive_name,
        output = %output_root.display(),
        "completed rendering archive"
    );
    Ok(RenderReport::Rendered(RenderSummary {
        archive_name,
        course_type,
        output_root,
        summary_page,
        walk,
    }))
}

/// Write `assets/css/style.css` (colors from config) and `assets/js/main.js`.
pub fn write_assets(output_root: &Path, config: &RenderConfig) -> std::io::Result<()> {
    let css_dir = output_root.join(ASSETS_DIR).join("css");
    let js_dir = output_root.join(ASSETS_DIR).join("js");
    fs::create_dir_all(&css_dir)?;
    fs::create_dir_all(&js_dir)?;

    let color_css = config::generate_color_css(&config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);
    write_atomic(&css_dir.join("style.css"), css.as_bytes())?;
    write_atomic(&js_dir.join("main.js"), JS.as_bytes())?;
    Ok(())
}

/// Absolute path with `.` and `..` resolved lexically.
fn normalize(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}
