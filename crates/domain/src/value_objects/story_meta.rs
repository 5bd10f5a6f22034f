use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema version written into every migrated document.
pub const CURRENT_SCHEMA_VERSION: &str = "3.1";

/// Title used when a legacy document carries none.
pub const UNTITLED: &str = "Untitled";

/// Document header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryMeta {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoryMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION.to_string(),
            title: title.into(),
            description: None,
            extra: Map::new(),
        }
    }
}

impl Default for StoryMeta {
    fn default() -> Self {
        Self::new(UNTITLED)
    }
}
