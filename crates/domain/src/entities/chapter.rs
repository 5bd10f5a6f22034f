//! Chapter entity - Named grouping of dialogues

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use storyloom_domain::ChapterId;

/// Id of the chapter synthesized for documents that predate chapters.
pub const MAIN_CHAPTER_ID: &str = "main";

/// Title of the chapter synthesized for documents that predate chapters.
pub const MAIN_CHAPTER_TITLE: &str = "Основная история";

/// Title given to chapters created from the editor.
pub const NEW_CHAPTER_TITLE: &str = "Новая глава";

/// A chapter of the story.
///
/// Dialogues reference their chapter by id; the chapter does not own them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields this schema does not know, carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Chapter {
    pub fn new(id: impl Into<ChapterId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            extra: Map::new(),
        }
    }

    /// The catch-all chapter for legacy documents.
    pub fn main() -> Self {
        Self::new(MAIN_CHAPTER_ID, MAIN_CHAPTER_TITLE)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
