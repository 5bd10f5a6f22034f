//! MiniGame entity - Activity definitions listed at document level
//!
//! The engine does not run minigames. It only needs the outcome edges, so
//! everything else about a definition is carried through as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::empty_as_none;
use storyloom_domain::{DialogueId, MiniGameId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniGame {
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<MiniGameId>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub on_win_dialogue_id: Option<DialogueId>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub on_lose_dialogue_id: Option<DialogueId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
