//! Story aggregate - the branching-narrative document
//!
//! Dialogues are stored arena-style: a flat list plus an id index. Edges are
//! plain [`DialogueId`] strings, so cycles are representable without any
//! ownership between nodes, and deleting a node only removes its arena entry
//! and sweeps the string references that pointed at it.
//!
//! # Invariants
//!
//! - Dialogue ids are unique; the index always points at the first holder
//! - Chapter and item ids are unique (enforced on insertion)
//! - Dialogues added through [`Story::add_dialogue`] reference an existing chapter
//! - After [`Story::remove_dialogue`] no edge in the story targets the removed id

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::{Chapter, Dialogue, Item, MiniGame};
use crate::error::DomainError;
use crate::events::{ClearedLink, DialogueRemoved, ItemRemoved};
use crate::value_objects::StoryMeta;
use storyloom_domain::{ChapterId, DialogueId, ItemId};

/// How one dialogue points at another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum LinkKind {
    /// The dialogue's own `nextDialogueId`
    Auto,
    /// `options[index].nextDialogueId`
    Option { index: usize },
    /// `options[index].miniGame.onWinDialogueId`
    MiniGameWin { index: usize },
    /// `options[index].miniGame.onLoseDialogueId`
    MiniGameLose { index: usize },
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::Option { index } => write!(f, "Option #{index}"),
            Self::MiniGameWin { index } => write!(f, "MiniGame win #{index}"),
            Self::MiniGameLose { index } => write!(f, "MiniGame lose #{index}"),
        }
    }
}

/// A directed edge of the dialogue graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<'a> {
    pub source: &'a DialogueId,
    pub target: &'a DialogueId,
    pub kind: LinkKind,
}

/// Every outgoing edge of a single dialogue, in document order.
pub fn outgoing_links(dialogue: &Dialogue) -> Vec<Link<'_>> {
    let mut links = Vec::new();
    if let Some(target) = &dialogue.next_dialogue_id {
        links.push(Link {
            source: &dialogue.id,
            target,
            kind: LinkKind::Auto,
        });
    }
    for (index, option) in dialogue.options.iter().enumerate() {
        if let Some(target) = &option.next_dialogue_id {
            links.push(Link {
                source: &dialogue.id,
                target,
                kind: LinkKind::Option { index },
            });
        }
        if let Some(game) = &option.mini_game {
            if let Some(target) = &game.on_win_dialogue_id {
                links.push(Link {
                    source: &dialogue.id,
                    target,
                    kind: LinkKind::MiniGameWin { index },
                });
            }
            if let Some(target) = &game.on_lose_dialogue_id {
                links.push(Link {
                    source: &dialogue.id,
                    target,
                    kind: LinkKind::MiniGameLose { index },
                });
            }
        }
    }
    links
}

/// Serialized shape of a current-schema document.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryDocument {
    #[serde(default)]
    meta: StoryMeta,
    #[serde(default)]
    chapters: Vec<Chapter>,
    #[serde(default)]
    dialogues: Vec<Dialogue>,
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mini_games: Option<Vec<MiniGame>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// A story document.
///
/// Build one from migrated JSON (see the engine's migration pipeline) or
/// programmatically:
///
/// ```
/// use storyloom_domain::{Chapter, Dialogue, Story, StoryMeta};
///
/// let mut story = Story::new(StoryMeta::new("Night Train"));
/// story.add_chapter(Chapter::new("ch1", "Departure")).unwrap();
/// story.add_dialogue(Dialogue::new("start", "ch1", "The whistle blows.")).unwrap();
///
/// assert!(story.dialogue("start").is_some());
/// assert!(story.dialogue("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoryDocument", into = "StoryDocument")]
pub struct Story {
    meta: StoryMeta,
    chapters: Vec<Chapter>,
    dialogues: Vec<Dialogue>,
    items: Vec<Item>,
    mini_games: Option<Vec<MiniGame>>,
    extra: Map<String, Value>,
    index: HashMap<DialogueId, usize>,
}

impl From<StoryDocument> for Story {
    fn from(doc: StoryDocument) -> Self {
        let mut story = Self {
            meta: doc.meta,
            chapters: doc.chapters,
            dialogues: doc.dialogues,
            items: doc.items,
            mini_games: doc.mini_games,
            extra: doc.extra,
            index: HashMap::new(),
        };
        story.reindex();
        story
    }
}

impl From<Story> for StoryDocument {
    fn from(story: Story) -> Self {
        Self {
            meta: story.meta,
            chapters: story.chapters,
            dialogues: story.dialogues,
            items: story.items,
            mini_games: story.mini_games,
            extra: story.extra,
        }
    }
}

impl Story {
    // =========================================================================
    // Constructor
    // =========================================================================

    pub fn new(meta: StoryMeta) -> Self {
        Self {
            meta,
            chapters: Vec::new(),
            dialogues: Vec::new(),
            items: Vec::new(),
            mini_games: None,
            extra: Map::new(),
            index: HashMap::new(),
        }
    }

    /// A story holding the given chapters and dialogues, indexed the same way
    /// a loaded document is: with duplicate ids the first dialogue wins lookups.
    pub fn from_parts(meta: StoryMeta, chapters: Vec<Chapter>, dialogues: Vec<Dialogue>) -> Self {
        Self::from(StoryDocument {
            meta,
            chapters,
            dialogues,
            items: Vec::new(),
            mini_games: None,
            extra: Map::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn meta(&self) -> &StoryMeta {
        &self.meta
    }

    #[inline]
    pub fn meta_mut(&mut self) -> &mut StoryMeta {
        &mut self.meta
    }

    #[inline]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[inline]
    pub fn dialogues(&self) -> &[Dialogue] {
        &self.dialogues
    }

    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[inline]
    pub fn mini_games(&self) -> Option<&[MiniGame]> {
        self.mini_games.as_deref()
    }

    /// Top-level keys this schema does not know.
    #[inline]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    // =========================================================================
    // Lookups (total: absence is a value, never an error)
    // =========================================================================

    /// Look up a dialogue by id. `None` signals a broken or missing reference.
    pub fn dialogue(&self, id: &str) -> Option<&Dialogue> {
        self.index.get(id).and_then(|&i| self.dialogues.get(i))
    }

    pub fn contains_dialogue(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// The entry point: the dialogue with `start_id` if present, else the first one.
    pub fn first_dialogue(&self, start_id: &str) -> Option<&Dialogue> {
        self.dialogue(start_id).or_else(|| self.dialogues.first())
    }

    /// Dialogues belonging to a chapter, in document order.
    pub fn chapter_dialogues(&self, chapter_id: &str) -> Vec<&Dialogue> {
        self.dialogues
            .iter()
            .filter(|d| d.chapter_id == chapter_id)
            .collect()
    }

    /// Dialogues with an automatic or option edge into `id`.
    pub fn backlinks(&self, id: &str) -> Vec<&Dialogue> {
        let target = DialogueId::new(id);
        self.dialogues
            .iter()
            .filter(|d| d.links_to(&target))
            .collect()
    }

    /// Every edge in the story, in document order.
    pub fn links(&self) -> Vec<Link<'_>> {
        self.dialogues.iter().flat_map(outgoing_links).collect()
    }

    /// Dialogues whose chapter id is missing from the chapter list.
    pub fn unknown_chapter_refs(&self) -> Vec<(&DialogueId, &ChapterId)> {
        self.dialogues
            .iter()
            .filter(|d| self.chapter(d.chapter_id.as_str()).is_none())
            .map(|d| (&d.id, &d.chapter_id))
            .collect()
    }

    /// Ids held by more than one dialogue.
    pub fn duplicate_dialogue_ids(&self) -> Vec<&DialogueId> {
        let mut seen: HashMap<&DialogueId, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for dialogue in &self.dialogues {
            let count = seen.entry(&dialogue.id).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(&dialogue.id);
            }
        }
        duplicates
    }

    // =========================================================================
    // Chapter mutations
    // =========================================================================

    pub fn add_chapter(&mut self, chapter: Chapter) -> Result<(), DomainError> {
        if chapter.id.is_empty() {
            return Err(DomainError::validation("Chapter id cannot be empty"));
        }
        if self.chapter(chapter.id.as_str()).is_some() {
            return Err(DomainError::duplicate_id("Chapter", chapter.id.as_str()));
        }
        self.chapters.push(chapter);
        Ok(())
    }

    pub fn rename_chapter(&mut self, id: &str, title: impl Into<String>) -> Result<(), DomainError> {
        let chapter = self
            .chapters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::not_found("Chapter", id))?;
        chapter.title = title.into();
        Ok(())
    }

    // =========================================================================
    // Dialogue mutations
    // =========================================================================

    pub fn add_dialogue(&mut self, dialogue: Dialogue) -> Result<(), DomainError> {
        self.check_dialogue(&dialogue, None)?;
        self.index
            .insert(dialogue.id.clone(), self.dialogues.len());
        self.dialogues.push(dialogue);
        Ok(())
    }

    /// Edit a dialogue in place.
    ///
    /// The edit is applied to a copy and only committed if the result still
    /// satisfies the id and chapter invariants.
    pub fn update_dialogue<F>(&mut self, id: &str, edit: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Dialogue),
    {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| DomainError::not_found("Dialogue", id))?;
        let mut edited = self.dialogues[position].clone();
        edit(&mut edited);
        self.check_dialogue(&edited, Some(id))?;
        self.dialogues[position] = edited;
        self.reindex();
        Ok(())
    }

    /// Remove a dialogue and clear every edge that pointed at it.
    ///
    /// Returns `None` if no dialogue has this id.
    pub fn remove_dialogue(&mut self, id: &str) -> Option<DialogueRemoved> {
        let position = *self.index.get(id)?;
        let dialogue = self.dialogues.remove(position);
        self.dialogues.retain(|d| d.id != id);
        self.reindex();

        let mut cleared_links = Vec::new();
        for other in &mut self.dialogues {
            if other.next_dialogue_id.as_ref().is_some_and(|t| t == id) {
                other.next_dialogue_id = None;
                cleared_links.push(ClearedLink {
                    source: other.id.clone(),
                    kind: LinkKind::Auto,
                });
            }
            for (index, option) in other.options.iter_mut().enumerate() {
                if option.next_dialogue_id.as_ref().is_some_and(|t| t == id) {
                    option.next_dialogue_id = None;
                    cleared_links.push(ClearedLink {
                        source: other.id.clone(),
                        kind: LinkKind::Option { index },
                    });
                }
                if let Some(game) = option.mini_game.as_mut() {
                    if game.on_win_dialogue_id.as_ref().is_some_and(|t| t == id) {
                        game.on_win_dialogue_id = None;
                        cleared_links.push(ClearedLink {
                            source: other.id.clone(),
                            kind: LinkKind::MiniGameWin { index },
                        });
                    }
                    if game.on_lose_dialogue_id.as_ref().is_some_and(|t| t == id) {
                        game.on_lose_dialogue_id = None;
                        cleared_links.push(ClearedLink {
                            source: other.id.clone(),
                            kind: LinkKind::MiniGameLose { index },
                        });
                    }
                }
            }
        }

        Some(DialogueRemoved {
            dialogue,
            cleared_links,
        })
    }

    // =========================================================================
    // Item mutations
    // =========================================================================

    pub fn add_item(&mut self, item: Item) -> Result<(), DomainError> {
        if item.id.is_empty() {
            return Err(DomainError::validation("Item id cannot be empty"));
        }
        if self.item(item.id.as_str()).is_some() {
            return Err(DomainError::duplicate_id("Item", item.id.as_str()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove an item from the catalogue.
    ///
    /// References from conditions and actions are left alone; the outcome
    /// lists the dialogues that still name the item.
    pub fn remove_item(&mut self, id: &str) -> Option<ItemRemoved> {
        let position = self.items.iter().position(|i| i.id == id)?;
        let item = self.items.remove(position);
        let still_referenced_by = self
            .dialogues
            .iter()
            .filter(|d| dialogue_mentions_item(d, &item.id))
            .map(|d| d.id.clone())
            .collect();
        Some(ItemRemoved {
            item,
            still_referenced_by,
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_dialogue(
        &self,
        dialogue: &Dialogue,
        replacing: Option<&str>,
    ) -> Result<(), DomainError> {
        if dialogue.id.is_empty() {
            return Err(DomainError::validation("Dialogue id cannot be empty"));
        }
        let renamed = replacing.map_or(true, |old| dialogue.id != old);
        if renamed && self.contains_dialogue(dialogue.id.as_str()) {
            return Err(DomainError::duplicate_id("Dialogue", dialogue.id.as_str()));
        }
        if self.chapter(dialogue.chapter_id.as_str()).is_none() {
            return Err(DomainError::not_found(
                "Chapter",
                dialogue.chapter_id.as_str(),
            ));
        }
        Ok(())
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, dialogue) in self.dialogues.iter().enumerate() {
            self.index.entry(dialogue.id.clone()).or_insert(position);
        }
    }
}

fn dialogue_mentions_item(dialogue: &Dialogue, item_id: &ItemId) -> bool {
    dialogue.on_enter.iter().any(|a| a.item_id() == Some(item_id))
        || dialogue.options.iter().any(|o| {
            o.visibility_condition.item_id() == Some(item_id)
                || o.actions.iter().any(|a| a.item_id() == Some(item_id))
        })
}
