//! Nanodegree home page.
//!
//! Written to `<output root>/index.html` before any lesson is rendered. It
//! shows the manifest's title, summary and syllabus outline, followed by one
//! link per lesson in walk order. Links point at the lesson's first concept
//! page when the lesson's concepts can be read, else at its directory.

use crate::assemble::write_atomic;
use crate::classify::CourseType;
use crate::lesson;
use crate::media::encode_path_segment;
use crate::templates::{self, PlanLink, SummaryView};
use crate::tree::DirectoryNode;
use crate::types::ArchiveManifest;
use crate::walk::{HierarchyDescriptor, visit_lessons};
use std::convert::Infallible;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SUMMARY_FILE: &str = "index.html";

/// The summary page sits next to `assets/`.
const ASSET_PREFIX: &str = "assets";

/// Links to every lesson the walk will render, in order.
pub fn lesson_links(root: &DirectoryNode, course_type: CourseType) -> Vec<PlanLink> {
    let mut links = Vec::new();
    let result: Result<(), Infallible> = visit_lessons(
        root,
        HierarchyDescriptor::for_course_type(course_type),
        &mut |visit| {
            let dir_name = visit.output_name();
            let first_page = match lesson::load_lesson(visit.node) {
                Ok(lesson) => lesson.first_page(),
                Err(e) => {
                    debug!(lesson = %visit.node.path.display(), error = %e, "lesson not loadable, linking its directory");
                    None
                }
            };
            let href = match first_page {
                Some(page) => format!(
                    "{}/{}",
                    encode_path_segment(&dir_name),
                    encode_path_segment(&page)
                ),
                None => format!("{}/", encode_path_segment(&dir_name)),
            };
            links.push(PlanLink {
                title: dir_name,
                href,
            });
            Ok(())
        },
    );
    match result {
        Ok(()) => links,
        Err(never) => match never {},
    }
}

/// Render the home page HTML.
pub fn render_summary(
    manifest: &ArchiveManifest,
    archive_name: &str,
    links: &[PlanLink],
) -> String {
    let title = manifest
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(archive_name);
    let view = SummaryView {
        title,
        summary: manifest.summary.as_deref(),
        parts: manifest.parts.as_deref().unwrap_or_default(),
        lessons: manifest.lessons.as_deref().unwrap_or_default(),
        plan: links,
    };
    templates::summary_page(&view, ASSET_PREFIX).into_string()
}

/// Write `index.html` into `output_root`.
pub fn write_summary(
    manifest: &ArchiveManifest,
    archive_name: &str,
    root: &DirectoryNode,
    course_type: CourseType,
    output_root: &Path,
) -> io::Result<PathBuf> {
    let links = lesson_links(root, course_type);
    let html = render_summary(manifest, archive_name, &links);

    let path = output_root.join(SUMMARY_FILE);
    write_atomic(&path, html.as_bytes())?;
    info!(file = %path.display(), lessons = links.len(), "wrote summary page");
    Ok(path)
}
