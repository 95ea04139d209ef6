//! Atom rendering: one [`Atom`] in, one HTML fragment out.
//!
//! Atoms are dispatched on their `semantic_type` tag through [`AtomKind`].
//! The set of known kinds is closed, but the tag in the archive is open:
//! anything unrecognised becomes [`AtomKind::Unknown`] and renders
//! [`UNKNOWN_ATOM_MESSAGE`] instead of failing, so a new upstream atom kind
//! never blocks a whole course from rendering.
//!
//! ## Submodules
//!
//! - [`content`]: text and image atoms, inline image localization
//! - [`video`]: video atoms and the player shared by feedback/answer videos
//! - [`quiz`]: checkbox, radio, matching, validated and code quizzes,
//!   reflections and task lists
//! - [`workspace`]: interactive workspaces (rendered as an offline notice)
//!
//! ## Failure
//!
//! A payload that does not match its kind's shape, or a media fetch that
//! fails, is an [`AtomError`]. The assembler aborts the concept on it.

pub mod content;
pub mod quiz;
pub mod video;
pub mod workspace;

use crate::config::MediaConfig;
use crate::media::{MediaError, MediaFetcher};
use crate::types::Atom;
use maud::{Markup, html};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Rendered in place of any atom whose `semantic_type` is not recognised.
pub const UNKNOWN_ATOM_MESSAGE: &str = "Unknown lesson atom type. Please contact the developer to make it compatible with this atom type!";

#[derive(Error, Debug)]
pub enum AtomError {
    #[error("{semantic_type} payload does not match: {source}")]
    Payload {
        semantic_type: String,
        source: serde_json::Error,
    },
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
}

/// The atom kinds this renderer understands, plus a catch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomKind {
    Image,
    TaskList,
    Text,
    Video,
    CheckboxQuiz,
    MatchingQuiz,
    RadioQuiz,
    Reflect,
    Quiz,
    ValidatedQuiz,
    Workspace,
    Unknown(String),
}

impl AtomKind {
    pub fn parse(semantic_type: &str) -> Self {
        match semantic_type {
            "ImageAtom" => AtomKind::Image,
            "TaskListAtom" => AtomKind::TaskList,
            "TextAtom" => AtomKind::Text,
            "VideoAtom" => AtomKind::Video,
            "CheckboxQuizAtom" => AtomKind::CheckboxQuiz,
            "MatchingQuizAtom" => AtomKind::MatchingQuiz,
            "RadioQuizAtom" => AtomKind::RadioQuiz,
            "ReflectAtom" => AtomKind::Reflect,
            "QuizAtom" => AtomKind::Quiz,
            "ValidatedQuizAtom" => AtomKind::ValidatedQuiz,
            "WorkspaceAtom" => AtomKind::Workspace,
            other => AtomKind::Unknown(other.to_string()),
        }
    }
}

/// Where and how an atom's media ends up.
#[derive(Clone, Copy)]
pub struct AtomContext<'a> {
    /// Lesson output directory; media lands in `img/` and `videos/` below it.
    pub lesson_dir: &'a Path,
    /// Ordinal prefix of the concept being assembled (`"03"`).
    pub prefix: &'a str,
    /// Position of the atom within its concept.
    pub index: usize,
    pub fetcher: &'a dyn MediaFetcher,
    pub media: &'a MediaConfig,
}

/// Render one atom to an HTML fragment.
pub fn render(atom: &Atom, ctx: &AtomContext<'_>) -> Result<String, AtomError> {
    let markup = match AtomKind::parse(&atom.semantic_type) {
        AtomKind::Image => content::render_image(atom, ctx)?,
        AtomKind::TaskList => quiz::render_task_list(atom, ctx)?,
        AtomKind::Text => content::render_text(atom, ctx)?,
        AtomKind::Video => video::render_video(atom, ctx)?,
        AtomKind::CheckboxQuiz => quiz::render_choice_quiz(atom, ctx, quiz::ChoiceInput::Checkbox)?,
        AtomKind::MatchingQuiz => quiz::render_matching_quiz(atom)?,
        AtomKind::RadioQuiz => quiz::render_choice_quiz(atom, ctx, quiz::ChoiceInput::Radio)?,
        AtomKind::Reflect => quiz::render_reflect(atom, ctx)?,
        AtomKind::Quiz => quiz::render_code_quiz(atom, ctx)?,
        AtomKind::ValidatedQuiz => quiz::render_validated_quiz(atom)?,
        AtomKind::Workspace => workspace::render_workspace(atom)?,
        AtomKind::Unknown(tag) => {
            debug!(semantic_type = %tag, "unknown atom type, rendering placeholder");
            unknown_placeholder()
        }
    };
    Ok(markup.into_string())
}

fn unknown_placeholder() -> Markup {
    html! {
        p.atom-unknown { (UNKNOWN_ATOM_MESSAGE) }
    }
}

/// Deserialize an atom's payload, tagging failures with its kind.
pub(crate) fn payload<T: DeserializeOwned>(atom: &Atom) -> Result<T, AtomError> {
    atom.payload_as().map_err(|source| AtomError::Payload {
        semantic_type: atom.semantic_type.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::tests::MockFetcher;
    use crate::test_helpers::atom;
    use tempfile::TempDir;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(AtomKind::parse("TextAtom"), AtomKind::Text);
        assert_eq!(AtomKind::parse("VideoAtom"), AtomKind::Video);
        assert_eq!(AtomKind::parse("WorkspaceAtom"), AtomKind::Workspace);
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(
            AtomKind::parse("textatom"),
            AtomKind::Unknown("textatom".to_string())
        );
    }

    #[test]
    fn unknown_atom_renders_placeholder() {
        let tmp = TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        let media = MediaConfig::default();
        let ctx = AtomContext {
            lesson_dir: tmp.path(),
            prefix: "00",
            index: 0,
            fetcher: &fetcher,
            media: &media,
        };
        let html = render(&atom(r#"{"semantic_type":"FutureAtom","x":1}"#), &ctx).unwrap();
        assert!(html.contains(UNKNOWN_ATOM_MESSAGE));
        assert!(fetcher.get_requests().is_empty());
    }

    #[test]
    fn empty_semantic_type_is_unknown() {
        let tmp = TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        let media = MediaConfig::default();
        let ctx = AtomContext {
            lesson_dir: tmp.path(),
            prefix: "00",
            index: 0,
            fetcher: &fetcher,
            media: &media,
        };
        let html = render(&atom(r#"{"title":"no tag"}"#), &ctx).unwrap();
        assert!(html.contains(UNKNOWN_ATOM_MESSAGE));
    }

    #[test]
    fn bad_payload_is_error() {
        let tmp = TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        let media = MediaConfig::default();
        let ctx = AtomContext {
            lesson_dir: tmp.path(),
            prefix: "00",
            index: 0,
            fetcher: &fetcher,
            media: &media,
        };
        let result = render(&atom(r#"{"semantic_type":"TextAtom","text":42}"#), &ctx);
        match result {
            Err(AtomError::Payload { semantic_type, .. }) => assert_eq!(semantic_type, "TextAtom"),
            other => panic!("expected payload error, got {other:?}"),
        }
    }
}
