//! # Coursepress
//!
//! Renders downloaded course archives as browsable static HTML. An archive is
//! a directory tree of JSON documents; every concept in it becomes one
//! standalone page, grouped per lesson with a sidebar, and Nanodegrees get a
//! summary page on top.
//!
//! # Architecture: One Sequential Pass
//!
//! ```text
//! 1. Scan       archive/          →  DirectoryNode tree
//! 2. Classify   data.json + tree  →  Course | Nanodegree
//! 3. Walk       tree              →  lessons in Part → Module → Lesson order
//! 4. Assemble   lesson JSON       →  one HTML page per concept
//! 5. Render     atom              →  HTML fragment (+ downloaded media)
//! ```
//!
//! Everything runs on one thread in a deterministic order, and the first error
//! stops the run. Pages written before the error stay on disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`render`] | Entry point: preconditions, output root, assets, summary, walk |
//! | [`walk`] | Hierarchy traversal and tag-joined lesson directory names |
//! | [`lesson`] | Lesson document loading and per-lesson sidebar |
//! | [`assemble`] | Concept pages: atom fragments wrapped in the page template |
//! | [`atom`] | One renderer per atom semantic type, placeholder for the rest |
//! | [`classify`] | Archive manifest reading and Course/Nanodegree classification |
//! | [`summary`] | Nanodegree `index.html` with the outline and lesson plan |
//! | [`media`] | Image, video and subtitle acquisition behind [`media::MediaFetcher`] |
//! | [`templates`] | Maud page templates and markdown conversion |
//! | [`config`] | `config.toml` loading, validation and color CSS generation |
//! | [`types`] | Serde models of the archive's JSON documents |
//! | [`tree`] | Directory scan into an in-memory tree in natural order |
//! | [`naming`] | Filesystem-safe names, hierarchy tags and natural sort |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup is
//! a build error, all interpolation is auto-escaped, and there is no template
//! directory to ship. Markdown bodies go through `pulldown-cmark` and are
//! embedded pre-escaped.
//!
//! ## Open Atom Set
//!
//! Archives keep gaining atom types. Unknown types render a fixed placeholder
//! instead of failing the page, so an old binary still produces a usable site
//! from a newer archive.
//!
//! ## Media Behind a Trait
//!
//! All network access goes through [`media::MediaFetcher`]. The CLI uses an
//! HTTP fetcher (or a link-only one with `--no-media`); tests substitute a
//! recording mock, so the whole pipeline is exercised without a network.

pub mod assemble;
pub mod atom;
pub mod classify;
pub mod config;
pub mod lesson;
pub mod media;
pub mod naming;
pub mod output;
pub mod render;
pub mod summary;
pub mod templates;
pub mod tree;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
