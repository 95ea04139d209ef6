//! Hierarchy traversal.
//!
//! Both archive types are walked by one recursive function driven by a
//! [`HierarchyDescriptor`], the list of container levels above the lessons:
//!
//! | Type | Levels | Lesson output directory |
//! |---|---|---|
//! | Course | none | `<Lesson name>` |
//! | Nanodegree | `Part <n>`, `Module <n>` | `<Part tag>-<Module tag>-<Lesson name>` |
//!
//! At a container level only directories whose name carries the level's tag
//! are entered; anything else is skipped. At lesson level every directory is
//! a lesson. All lessons land flat in the output root.
//!
//! Siblings are visited one at a time in tree order and the first error stops
//! the walk.

use crate::classify::CourseType;
use crate::config::MediaConfig;
use crate::lesson::{self, LessonError};
use crate::media::MediaFetcher;
use crate::naming::{TagKind, filenamify, hierarchy_tag, make_dir};
use crate::tree::DirectoryNode;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Lesson {path} failed: {source}")]
    Lesson { path: PathBuf, source: LessonError },
}

/// Container levels above the lesson directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyDescriptor {
    pub levels: &'static [TagKind],
}

impl HierarchyDescriptor {
    pub fn for_course_type(course_type: CourseType) -> Self {
        match course_type {
            CourseType::Course => Self { levels: &[] },
            CourseType::Nanodegree => Self {
                levels: &[TagKind::Part, TagKind::Module],
            },
        }
    }
}

/// A lesson directory reached by the traversal.
#[derive(Debug, Clone, Copy)]
pub struct LessonVisit<'a> {
    pub node: &'a DirectoryNode,
    /// Tags of the enclosing containers, outermost first.
    pub tags: &'a [String],
}

impl LessonVisit<'_> {
    /// Output directory name for this lesson, already filesystem-safe.
    pub fn output_name(&self) -> String {
        if self.tags.is_empty() {
            filenamify(&self.node.name)
        } else {
            filenamify(&format!("{}-{}", self.tags.join("-"), self.node.name))
        }
    }
}

/// Call `visitor` for every lesson under `root`, in order.
pub fn visit_lessons<E>(
    root: &DirectoryNode,
    descriptor: HierarchyDescriptor,
    visitor: &mut dyn FnMut(LessonVisit<'_>) -> Result<(), E>,
) -> Result<(), E> {
    let mut tags = Vec::new();
    visit_level(root, descriptor.levels, &mut tags, visitor)
}

fn visit_level<E>(
    node: &DirectoryNode,
    levels: &[TagKind],
    tags: &mut Vec<String>,
    visitor: &mut dyn FnMut(LessonVisit<'_>) -> Result<(), E>,
) -> Result<(), E> {
    match levels.split_first() {
        Some((kind, rest)) => {
            for child in node.subdirs() {
                let Some(tag) = hierarchy_tag(&child.name, *kind) else {
                    debug!(dir = %child.path.display(), level = ?kind, "skipping untagged directory");
                    continue;
                };
                tags.push(tag);
                let result = visit_level(child, rest, tags, visitor);
                tags.pop();
                result?;
            }
        }
        None => {
            for child in node.subdirs() {
                visitor(LessonVisit {
                    node: child,
                    tags: tags.as_slice(),
                })?;
            }
        }
    }
    Ok(())
}

/// A lesson the walk would render, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLesson {
    pub source: PathBuf,
    pub output_name: String,
}

/// The lessons of an archive in render order, without touching the output.
pub fn plan(root: &DirectoryNode, course_type: CourseType) -> Vec<PlannedLesson> {
    let mut lessons = Vec::new();
    let result: Result<(), Infallible> = visit_lessons(
        root,
        HierarchyDescriptor::for_course_type(course_type),
        &mut |visit| {
            lessons.push(PlannedLesson {
                source: visit.node.path.clone(),
                output_name: visit.output_name(),
            });
            Ok(())
        },
    );
    match result {
        Ok(()) => lessons,
        Err(never) => match never {},
    }
}

/// Counts from a completed walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Lessons with at least one page written.
    pub lessons: usize,
    /// Concept pages written, in write order.
    pub pages: Vec<PathBuf>,
    /// Lessons without concepts.
    pub skipped: usize,
}

/// Render every lesson under `root` into `output_root`.
pub fn walk(
    root: &DirectoryNode,
    course_type: CourseType,
    output_root: &Path,
    fetcher: &dyn MediaFetcher,
    media: &MediaConfig,
) -> Result<WalkReport, WalkError> {
    let mut report = WalkReport::default();
    visit_lessons::<WalkError>(
        root,
        HierarchyDescriptor::for_course_type(course_type),
        &mut |visit| {
            let lesson_dir = make_dir(output_root, &visit.output_name())?;
            let pages = lesson::render_lesson(visit.node, &lesson_dir, fetcher, media).map_err(
                |source| WalkError::Lesson {
                    path: visit.node.path.clone(),
                    source,
                },
            )?;
            if pages.is_empty() {
                report.skipped += 1;
            } else {
                report.lessons += 1;
                report.pages.extend(pages);
            }
            Ok(())
        },
    )?;

    info!(
        lessons = report.lessons,
        concepts = report.pages.len(),
        skipped = report.skipped,
        "walk complete"
    );
    Ok(report)
}
