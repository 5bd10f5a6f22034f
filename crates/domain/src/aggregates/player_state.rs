//! PlayerState aggregate - mutable progress of one playthrough
//!
//! Mutations return [`PlayerStateChange`] values describing what happened,
//! so the action interpreter can report a batch without diffing states.
//! Arithmetic saturates instead of overflowing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::events::PlayerStateChange;
use storyloom_domain::{ChapterId, DialogueId, ItemId};

/// Stat keys every fresh player carries at 0.
pub const BASELINE_STATS: [&str; 3] = ["knowledge", "courage", "charisma"];

/// Position and score within the story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(default)]
    pub current_chapter: Option<ChapterId>,
    #[serde(default)]
    pub completed_dialogues: BTreeSet<DialogueId>,
    #[serde(default)]
    pub score: i64,
}

/// Inventory, stats, flags and progress of a player.
///
/// # Example
///
/// ```
/// use storyloom_domain::PlayerState;
///
/// let mut player = PlayerState::with_baseline();
/// player.add_item("torch".into());
/// player.change_stat("courage", 2);
///
/// assert!(player.has_item("torch"));
/// assert_eq!(player.stat("courage"), 2);
/// assert_eq!(player.stat("luck"), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    #[serde(default)]
    inventory: BTreeSet<ItemId>,
    #[serde(default)]
    stats: BTreeMap<String, i64>,
    #[serde(default)]
    flags: BTreeMap<String, bool>,
    #[serde(default)]
    progress: Progress,
}

impl PlayerState {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// An empty player: no items, no stats, no flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh player with the given stat keys at 0.
    pub fn with_stats<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stats: names.into_iter().map(|n| (n.into(), 0)).collect(),
            ..Self::default()
        }
    }

    /// A fresh player with [`BASELINE_STATS`] at 0.
    pub fn with_baseline() -> Self {
        Self::with_stats(BASELINE_STATS)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn inventory(&self) -> &BTreeSet<ItemId> {
        &self.inventory
    }

    #[inline]
    pub fn stats(&self) -> &BTreeMap<String, i64> {
        &self.stats
    }

    #[inline]
    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    #[inline]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.progress.score
    }

    #[inline]
    pub fn current_chapter(&self) -> Option<&ChapterId> {
        self.progress.current_chapter.as_ref()
    }

    #[inline]
    pub fn completed_dialogues(&self) -> &BTreeSet<DialogueId> {
        &self.progress.completed_dialogues
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn has_item(&self, item_id: &str) -> bool {
        self.inventory.contains(item_id)
    }

    /// A stat's value, 0 when the stat was never set.
    pub fn stat(&self, name: &str) -> i64 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    /// A stat's value, `None` when the stat was never set.
    pub fn stat_value(&self, name: &str) -> Option<i64> {
        self.stats.get(name).copied()
    }

    /// True only for flags explicitly set to true.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn has_completed(&self, dialogue_id: &str) -> bool {
        self.progress.completed_dialogues.contains(dialogue_id)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn add_item(&mut self, item_id: ItemId) -> PlayerStateChange {
        if self.inventory.contains(&item_id) {
            PlayerStateChange::ItemAlreadyHeld { item_id }
        } else {
            self.inventory.insert(item_id.clone());
            PlayerStateChange::ItemAdded { item_id }
        }
    }

    pub fn remove_item(&mut self, item_id: ItemId) -> PlayerStateChange {
        if self.inventory.remove(&item_id) {
            PlayerStateChange::ItemRemoved { item_id }
        } else {
            PlayerStateChange::ItemNotHeld { item_id }
        }
    }

    /// Add `delta` to a stat, creating it at 0 first if absent.
    pub fn change_stat(&mut self, stat: &str, delta: i64) -> PlayerStateChange {
        let entry = self.stats.entry(stat.to_string()).or_insert(0);
        let from = *entry;
        *entry = from.saturating_add(delta);
        PlayerStateChange::StatChanged {
            stat: stat.to_string(),
            from,
            to: *entry,
        }
    }

    pub fn set_flag(&mut self, flag: &str, value: bool) -> PlayerStateChange {
        let from = self.flags.insert(flag.to_string(), value);
        PlayerStateChange::FlagChanged {
            flag: flag.to_string(),
            from,
            to: value,
        }
    }

    pub fn add_score(&mut self, delta: i64) -> PlayerStateChange {
        let from = self.progress.score;
        self.progress.score = from.saturating_add(delta);
        PlayerStateChange::ScoreChanged {
            from,
            to: self.progress.score,
        }
    }

    /// Record a visit. `None` if the dialogue was already completed.
    pub fn complete_dialogue(&mut self, dialogue_id: DialogueId) -> Option<PlayerStateChange> {
        if self.progress.completed_dialogues.contains(&dialogue_id) {
            return None;
        }
        self.progress
            .completed_dialogues
            .insert(dialogue_id.clone());
        Some(PlayerStateChange::DialogueCompleted { dialogue_id })
    }

    /// Move to a chapter. `None` if already there.
    pub fn enter_chapter(&mut self, chapter_id: ChapterId) -> Option<PlayerStateChange> {
        if self.progress.current_chapter.as_ref() == Some(&chapter_id) {
            return None;
        }
        let from = self.progress.current_chapter.replace(chapter_id.clone());
        Some(PlayerStateChange::ChapterChanged {
            from,
            to: chapter_id,
        })
    }
}
