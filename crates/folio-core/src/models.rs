//! Note models as seen by the search indexing subsystem.
//!
//! The note store itself is an external collaborator; these types are the
//! read-only view the indexer consumes.

use serde::{Deserialize, Serialize};

use crate::defaults::INDEXABLE_NOTE_TYPES;

/// Note type, as stored by the note store.
///
/// Only a closed set of types carries searchable text; everything else
/// (images, files, widgets) stays out of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteType {
    Text,
    Code,
    Mermaid,
    Canvas,
    MindMap,
    /// Any type whose content is not indexed.
    Other,
}

impl NoteType {
    /// Parse a note store type string. Unknown types map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "text" => NoteType::Text,
            "code" => NoteType::Code,
            "mermaid" => NoteType::Mermaid,
            "canvas" => NoteType::Canvas,
            "mindMap" => NoteType::MindMap,
            _ => NoteType::Other,
        }
    }

    /// Whether notes of this type belong in the search index.
    pub fn is_indexable(&self) -> bool {
        !matches!(self, NoteType::Other)
    }

    /// The note store's string form, for SQL comparisons.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::Text => "text",
            NoteType::Code => "code",
            NoteType::Mermaid => "mermaid",
            NoteType::Canvas => "canvas",
            NoteType::MindMap => "mindMap",
            NoteType::Other => "other",
        }
    }
}

/// Build a SQL `IN (...)` list of the indexable type names.
///
/// The list is a code constant, never user input, so inlining the quoted
/// literals is safe.
pub fn indexable_types_sql_list() -> String {
    INDEXABLE_NOTE_TYPES
        .iter()
        .map(|t| format!("'{}'", t))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read-only view of a note, joined with its content blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Opaque stable key assigned by the note store.
    pub note_id: String,
    pub title: String,
    pub note_type: NoteType,
    pub mime: String,
    pub is_protected: bool,
    pub is_deleted: bool,
    /// Blob content; `None` when the note has no blob.
    /// Ciphertext for protected notes.
    pub content: Option<String>,
}

impl Note {
    /// Whether this note should have a persistent index entry.
    pub fn is_indexable(&self) -> bool {
        self.note_type.is_indexable() && !self.is_deleted && !self.is_protected
    }
}
