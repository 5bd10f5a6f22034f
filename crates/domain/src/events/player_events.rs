//! PlayerState mutation outcomes.

use serde::{Deserialize, Serialize};

use crate::{ChapterId, DialogueId, ItemId};

/// What a single action did to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "change")]
pub enum PlayerStateChange {
    ItemAdded { item_id: ItemId },
    /// `add_item` for an item already held; inventory unchanged
    ItemAlreadyHeld { item_id: ItemId },
    ItemRemoved { item_id: ItemId },
    /// `remove_item` for an item not held; inventory unchanged
    ItemNotHeld { item_id: ItemId },
    StatChanged { stat: String, from: i64, to: i64 },
    FlagChanged {
        flag: String,
        from: Option<bool>,
        to: bool,
    },
    ScoreChanged { from: i64, to: i64 },
    DialogueCompleted { dialogue_id: DialogueId },
    ChapterChanged {
        from: Option<ChapterId>,
        to: ChapterId,
    },
    /// Action skipped because its kind or payload is not understood
    Ignored { kind: String },
}
