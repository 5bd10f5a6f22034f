//! GameSession aggregate - a persisted playthrough snapshot
//!
//! The playback engine works on a live [`PlayerState`] plus a current
//! dialogue id. A `GameSession` freezes those two together with bookkeeping
//! (timestamps, bookmarks) so a host can store it as an opaque blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregates::PlayerState;
use storyloom_domain::{DialogueId, SessionId};

/// A saved place in the story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameBookmark {
    pub dialogue_id: DialogueId,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Snapshot of one playthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    id: SessionId,
    story_id: String,
    player_state: PlayerState,
    current_dialogue_id: Option<DialogueId>,
    created_at: DateTime<Utc>,
    last_played: DateTime<Utc>,
    #[serde(default)]
    bookmarks: Vec<GameBookmark>,
}

impl GameSession {
    pub fn new(
        story_id: impl Into<String>,
        player_state: PlayerState,
        current_dialogue_id: Option<DialogueId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            story_id: story_id.into(),
            player_state,
            current_dialogue_id,
            created_at: now,
            last_played: now,
            bookmarks: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn story_id(&self) -> &str {
        &self.story_id
    }

    #[inline]
    pub fn player_state(&self) -> &PlayerState {
        &self.player_state
    }

    #[inline]
    pub fn current_dialogue_id(&self) -> Option<&DialogueId> {
        self.current_dialogue_id.as_ref()
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn last_played(&self) -> DateTime<Utc> {
        self.last_played
    }

    #[inline]
    pub fn bookmarks(&self) -> &[GameBookmark] {
        &self.bookmarks
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace the stored progress with a newer one.
    pub fn record_progress(
        &mut self,
        player_state: PlayerState,
        current_dialogue_id: Option<DialogueId>,
        now: DateTime<Utc>,
    ) {
        self.player_state = player_state;
        self.current_dialogue_id = current_dialogue_id;
        self.last_played = now;
    }

    pub fn add_bookmark(
        &mut self,
        dialogue_id: DialogueId,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.bookmarks.push(GameBookmark {
            dialogue_id,
            timestamp: now,
            notes,
        });
    }

    pub fn remove_bookmark(&mut self, index: usize) -> Option<GameBookmark> {
        (index < self.bookmarks.len()).then(|| self.bookmarks.remove(index))
    }
}
