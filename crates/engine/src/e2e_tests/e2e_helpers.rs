//! Shared fixtures for the end-to-end tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::fs_store::FsStoryStore;
use crate::use_cases::{load_story, PlaySession, StoryLibrary};

/// The torch story: one option on `start` picks up a torch and moves on.
pub fn torch_story_json() -> Value {
    json!({
        "dialogues": [
            {
                "id": "start",
                "chapterId": "ch1",
                "text": "Begin",
                "options": [{
                    "text": "Take torch",
                    "actions": [{"type": "add_item", "id": "torch"}],
                    "nextDialogueId": "d2",
                    "enabled": true,
                    "visible": true,
                    "visibilityCondition": {"type": "always"}
                }]
            },
            {"id": "d2", "chapterId": "ch1", "text": "You have a torch.", "options": []}
        ],
        "chapters": [{"id": "ch1", "title": "Ch1"}],
        "items": [{"id": "torch", "name": "Torch", "description": "", "icon": "", "type": "tool"}]
    })
}

/// A two-chapter cave with gated options and a minigame fork.
pub fn cave_story_json() -> Value {
    json!({
        "meta": {"version": "3.1", "title": "The Cave"},
        "chapters": [
            {"id": "ch1", "title": "Entrance"},
            {"id": "ch2", "title": "Depths"}
        ],
        "dialogues": [
            {
                "id": "start",
                "chapterId": "ch1",
                "text": "A cave mouth yawns ahead.",
                "options": [
                    {
                        "text": "Pick up the rusty key",
                        "actions": [
                            {"type": "add_item", "id": "key"},
                            {"type": "stat_change", "stat": "courage", "value": 2}
                        ],
                        "nextDialogueId": "gate"
                    },
                    {"text": "Walk to the gate", "nextDialogueId": "gate"}
                ]
            },
            {
                "id": "gate",
                "chapterId": "ch1",
                "text": "An iron gate.",
                "options": [
                    {
                        "text": "Unlock it",
                        "visibilityCondition": {"type": "has_item", "itemId": "key"},
                        "actions": [{"type": "remove_item", "id": "key"}],
                        "nextDialogueId": "hall"
                    },
                    {
                        "text": "Squeeze through the bars",
                        "visibilityCondition": {"type": "stat_greater", "statName": "courage", "statValue": 1},
                        "nextDialogueId": "hall"
                    },
                    {"text": "Go back", "nextDialogueId": "start"}
                ]
            },
            {
                "id": "hall",
                "chapterId": "ch2",
                "text": "A troll blocks the hall.",
                "onEnter": [{"type": "add_score", "value": 10}],
                "options": [{
                    "text": "Play dice with the troll",
                    "miniGame": {"id": "dice", "onWinDialogueId": "treasure", "onLoseDialogueId": "start"}
                }]
            },
            {
                "id": "treasure",
                "chapterId": "ch2",
                "text": "Gold!",
                "onEnter": [{"type": "set_flag", "id": "rich"}, {"type": "add_score", "value": 50}]
            }
        ],
        "items": [{"id": "key", "name": "Rusty key", "type": "key"}]
    })
}

/// Load document JSON through the text boundary and start playing it.
pub fn play(document: &Value) -> PlaySession {
    let story = load_story(&document.to_string()).expect("fixture should load");
    PlaySession::new(story, EngineConfig::default()).expect("fixture should be playable")
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 18, 30, 0).unwrap()
}

/// A library over a fresh temporary directory.
pub struct TempLibrary {
    pub library: StoryLibrary,
    pub dir: TempDir,
}

impl TempLibrary {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(FsStoryStore::new(dir.path()));
        let library = StoryLibrary::new(store, Arc::new(FixedClock(fixed_now())));
        Self { library, dir }
    }
}
