//! Archive JSON models.
//!
//! These mirror the documents the downloader writes into an archive: the root
//! `data.json` manifest, per-lesson `data.json` documents, and standalone
//! concept files. Only the fields the renderer reads are modelled; everything
//! else is ignored, since the upstream schema grows new keys regularly.
//!
//! Atom payloads are deliberately *not* typed here. An [`Atom`] keeps its
//! kind-specific keys as raw JSON and the matching renderer in
//! [`crate::atom`] deserializes the shape it needs, so a new or odd atom kind
//! never prevents the rest of the concept from loading.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root `data.json` of an archive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchiveManifest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub semantic_type: Option<String>,
    /// Present on Nanodegrees.
    #[serde(default)]
    pub parts: Option<Vec<PartOutline>>,
    /// Present on single courses.
    #[serde(default)]
    pub lessons: Option<Vec<LessonOutline>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartOutline {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleOutline>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleOutline {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonOutline {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
}

/// A lesson `data.json`: the lesson title and its concepts in order.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

/// One lesson page worth of atoms.
#[derive(Debug, Clone, Deserialize)]
pub struct Concept {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub atoms: Vec<Atom>,
}

/// The smallest renderable content unit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Atom {
    /// Open tag; see [`crate::atom::AtomKind`] for the known values.
    #[serde(default)]
    pub semantic_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub instructor_notes: Option<String>,
    /// Every other key of the atom object, untouched.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Atom {
    /// Deserialize the kind-specific payload into `T`.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.payload.clone()))
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_keeps_unknown_keys_in_payload() {
        let atom: Atom = serde_json::from_str(
            r#"{"semantic_type":"TextAtom","title":"Intro","text":"hello","id":7}"#,
        )
        .unwrap();
        assert_eq!(atom.semantic_type, "TextAtom");
        assert_eq!(atom.title.as_deref(), Some("Intro"));
        assert_eq!(atom.payload.get("text").unwrap(), "hello");
        assert!(atom.payload.contains_key("id"));
        assert!(!atom.payload.contains_key("semantic_type"));
    }

    #[test]
    fn atom_null_fields_tolerated() {
        let atom: Atom =
            serde_json::from_str(r#"{"semantic_type":"TextAtom","title":null,"instructor_notes":null}"#)
                .unwrap();
        assert_eq!(atom.title_or_empty(), "");
        assert!(atom.instructor_notes.is_none());
    }

    #[test]
    fn payload_as_typed() {
        #[derive(Deserialize)]
        struct Text {
            text: String,
        }
        let atom: Atom =
            serde_json::from_str(r#"{"semantic_type":"TextAtom","text":"**bold**"}"#).unwrap();
        let text: Text = atom.payload_as().unwrap();
        assert_eq!(text.text, "**bold**");
    }

    #[test]
    fn concept_defaults_to_no_atoms() {
        let concept: Concept = serde_json::from_str(r#"{"title":"Empty"}"#).unwrap();
        assert!(concept.atoms.is_empty());
    }

    #[test]
    fn manifest_nanodegree_shape() {
        let manifest: ArchiveManifest = serde_json::from_str(
            r#"{
                "title": "Data Analyst",
                "semantic_type": "Degree",
                "parts": [{"title": "Intro", "modules": [{"title": "M1", "lessons": [{"title": "L1"}]}]}]
            }"#,
        )
        .unwrap();
        let parts = manifest.parts.unwrap();
        assert_eq!(parts[0].modules[0].lessons[0].title, "L1");
        assert!(manifest.lessons.is_none());
    }

    #[test]
    fn lesson_document_parses_concepts() {
        let lesson: LessonDocument = serde_json::from_str(
            r#"{"title":"L","concepts":[{"title":"C1","atoms":[{"semantic_type":"TextAtom","text":"x"}]}]}"#,
        )
        .unwrap();
        assert_eq!(lesson.concepts.len(), 1);
        assert_eq!(lesson.concepts[0].atoms[0].semantic_type, "TextAtom");
    }
}
