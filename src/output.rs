//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. Progress during a render is reported
//! through `tracing`; this module only prints the final inventory.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! Nanodegree: Data Analyst → /out/Data Analyst
//! Home → index.html
//! 001 Part 01-Module 01-Lesson 1 Intro
//!     00. Welcome.html
//!     01. Setup.html
//! 002 Part 01-Module 01-Lesson 2 Tools
//!     00. Tools.html
//!
//! Rendered 2 lessons, 3 pages (0 skipped)
//! ```
//!
//! ## Check
//!
//! ```text
//! Nanodegree: Data Analyst
//! 001 Part 01-Module 01-Lesson 1 Intro
//!     Source: Part 01/Module 01/Lesson 1 Intro
//!
//! 1 lesson
//! ```

use crate::classify::CourseType;
use crate::render::{RenderReport, RenderSummary};
use crate::walk::PlannedLesson;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn type_label(course_type: CourseType) -> &'static str {
    match course_type {
        CourseType::Course => "Course",
        CourseType::Nanodegree => "Nanodegree",
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

// ============================================================================
// Render
// ============================================================================

pub fn format_render_output(report: &RenderReport) -> Vec<String> {
    match report {
        RenderReport::Skipped { source } => vec![format!(
            "Skipped {}: no data.json, not a course archive",
            source.display()
        )],
        RenderReport::Rendered(summary) => format_rendered(summary),
    }
}

fn format_rendered(summary: &RenderSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {} → {}",
        type_label(summary.course_type),
        summary.archive_name,
        summary.output_root.display()
    )];
    if let Some(page) = &summary.summary_page {
        lines.push(format!("Home → {}", file_name(page)));
    }

    let mut current_lesson: Option<String> = None;
    let mut lesson_index = 0;
    for page in &summary.walk.pages {
        let lesson = page.parent().map(file_name).unwrap_or_default();
        if current_lesson.as_deref() != Some(lesson.as_str()) {
            lesson_index += 1;
            lines.push(format!("{} {}", format_index(lesson_index), lesson));
            current_lesson = Some(lesson);
        }
        lines.push(format!("{}{}", indent(1), file_name(page)));
    }

    lines.push(String::new());
    lines.push(format!(
        "Rendered {}, {} ({} skipped)",
        plural(summary.walk.lessons, "lesson"),
        plural(summary.walk.pages.len(), "page"),
        summary.walk.skipped
    ));
    lines
}

pub fn print_render_output(report: &RenderReport) {
    for line in format_render_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// `course_type` is `None` when the source has no `data.json`.
pub fn format_check_output(
    source: &Path,
    archive_name: &str,
    course_type: Option<CourseType>,
    plan: &[PlannedLesson],
) -> Vec<String> {
    let Some(course_type) = course_type else {
        return vec![format!(
            "{}: no data.json, not a course archive",
            source.display()
        )];
    };

    let mut lines = vec![format!("{}: {}", type_label(course_type), archive_name)];
    for (i, lesson) in plan.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), lesson.output_name));
        let rel = lesson.source.strip_prefix(source).unwrap_or(&lesson.source);
        lines.push(format!("{}Source: {}", indent(1), rel.display()));
    }
    lines.push(String::new());
    lines.push(plural(plan.len(), "lesson"));
    lines
}

pub fn print_check_output(
    source: &Path,
    archive_name: &str,
    course_type: Option<CourseType>,
    plan: &[PlannedLesson],
) {
    for line in format_check_output(source, archive_name, course_type, plan) {
        println!("{}", line);
    }
}
