//! HTML templates.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! every template is type-checked Rust with automatic escaping. Text that the
//! archive supplies as markdown (atom titles, instructor notes, text atoms,
//! quiz prompts) goes through [`markdown_to_html`] and is inserted with
//! `PreEscaped`.
//!
//! ## Page Layout
//!
//! ```text
//! ┌───────────────┬──────────────────────────────────┐
//! │ lesson title  │ <prefix>. <concept title>        │
//! │ 00. Concept   │ ┌──────────────────────────────┐ │
//! │ 01. Concept   │ │ atom wrapper (title, body,   │ │
//! │ ...           │ │ instructor notes)            │ │
//! │               │ └──────────────────────────────┘ │
//! └───────────────┴──────────────────────────────────┘
//! ```
//!
//! Stylesheet and script are linked, not inlined: every page references
//! `<asset prefix>/css/style.css` and `<asset prefix>/js/main.js`.

use crate::types::{LessonOutline, PartOutline};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};

/// Convert markdown to an HTML string. Empty input yields an empty string.
pub fn markdown_to_html(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(text, options);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// Markdown rendered and marked safe for insertion into a template.
pub fn markdown(text: &str) -> Markup {
    PreEscaped(markdown_to_html(text))
}

/// Renders the base HTML document structure
pub fn document(title: &str, asset_prefix: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href={ (asset_prefix) "/css/style.css" };
                script src={ (asset_prefix) "/js/main.js" } defer {}
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

// ============================================================================
// Lesson pages
// ============================================================================

/// One sidebar entry: a concept page of the current lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarLink {
    pub title: String,
    pub href: String,
}

/// Lesson navigation shared by every concept page of a lesson.
pub fn sidebar(lesson_title: &str, links: &[SidebarLink]) -> Markup {
    html! {
        input.nav-toggle type="checkbox" id="nav-toggle";
        label.nav-hamburger for="nav-toggle" {
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        nav.lesson-nav {
            h2.lesson-title { (lesson_title) }
            ol {
                @for link in links {
                    li { a href=(link.href) { (link.title) } }
                }
            }
        }
    }
}

/// Wraps one rendered atom with its title and instructor notes.
pub fn atom_wrapper(title: Option<&str>, instructor_notes: Option<&str>, fragment: &str) -> Markup {
    let title = title.filter(|t| !t.trim().is_empty());
    let notes = instructor_notes.filter(|n| !n.trim().is_empty());
    html! {
        section.atom {
            @if let Some(title) = title {
                div.atom-title { (markdown(title)) }
            }
            div.atom-body { (PreEscaped(fragment)) }
            @if let Some(notes) = notes {
                aside.instructor-notes {
                    h4 { "Instructor Notes" }
                    (markdown(notes))
                }
            }
        }
    }
}

/// A complete concept page.
pub fn page(title: &str, sidebar_html: &str, content_html: &str, asset_prefix: &str) -> Markup {
    let content = html! {
        div.layout {
            aside.sidebar { (PreEscaped(sidebar_html)) }
            main.concept {
                h1.concept-title { (title) }
                (PreEscaped(content_html))
            }
        }
    };
    document(title, asset_prefix, Some("concept-page"), content)
}

// ============================================================================
// Summary page
// ============================================================================

/// A link from the summary page to a rendered lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanLink {
    pub title: String,
    pub href: String,
}

/// Everything the Nanodegree home page shows.
pub struct SummaryView<'a> {
    pub title: &'a str,
    pub summary: Option<&'a str>,
    pub parts: &'a [PartOutline],
    pub lessons: &'a [LessonOutline],
    pub plan: &'a [PlanLink],
}

/// The archive home page (`index.html` at the output root).
pub fn summary_page(view: &SummaryView<'_>, asset_prefix: &str) -> Markup {
    let content = html! {
        main.summary {
            h1 { (view.title) }
            @if let Some(summary) = view.summary {
                div.summary-text { (markdown(summary)) }
            }
            @if !view.parts.is_empty() || !view.lessons.is_empty() {
                section.outline {
                    h2 { "Syllabus" }
                    @for part in view.parts {
                        div.outline-part {
                            h3 { (part.title) }
                            @if let Some(summary) = &part.summary {
                                (markdown(summary))
                            }
                            @for module in &part.modules {
                                h4 { (module.title) }
                                (lesson_outline(&module.lessons))
                            }
                        }
                    }
                    (lesson_outline(view.lessons))
                }
            }
            @if !view.plan.is_empty() {
                section.lesson-plan {
                    h2 { "Lessons" }
                    ol {
                        @for link in view.plan {
                            li { a href=(link.href) { (link.title) } }
                        }
                    }
                }
            }
        }
    };
    document(view.title, asset_prefix, Some("summary-page"), content)
}

fn lesson_outline(lessons: &[LessonOutline]) -> Markup {
    html! {
        @if !lessons.is_empty() {
            ul.outline-lessons {
                @for lesson in lessons {
                    li {
                        span.outline-lesson-title { (lesson.title) }
                        @if let Some(summary) = &lesson.summary {
                            div.outline-lesson-summary { (markdown(summary)) }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
