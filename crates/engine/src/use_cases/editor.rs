//! Authoring use case - editing a story with a chapter/dialogue selection.

use storyloom_domain::{
    Chapter, ChapterId, Dialogue, DialogueId, DialogueOption, DialogueRemoved, DomainError, Item,
    ItemRemoved, LinkKind, Story, StoryMeta, NEW_CHAPTER_TITLE, NEW_DIALOGUE_TEXT,
};

use crate::entities::GraphNavigator;
use crate::use_cases::integrity::IntegrityReport;

/// Title of a story created from scratch.
pub const NEW_STORY_TITLE: &str = "New Story";

/// A new story: one chapter holding the start dialogue.
pub fn new_story_template() -> Story {
    Story::from_parts(
        StoryMeta::new(NEW_STORY_TITLE),
        vec![Chapter::new("ch1", "Глава 1")],
        vec![Dialogue::new("start", "ch1", "Начало...")],
    )
}

/// An owned story plus what the author has selected.
#[derive(Debug, Clone)]
pub struct EditorSession {
    story: Story,
    selected_chapter: Option<ChapterId>,
    selected_dialogue: Option<DialogueId>,
}

impl EditorSession {
    /// Open a story with its first chapter and first dialogue selected.
    pub fn new(story: Story) -> Self {
        let selected_chapter = story.chapters().first().map(|c| c.id.clone());
        let selected_dialogue = story.dialogues().first().map(|d| d.id.clone());
        Self {
            story,
            selected_chapter,
            selected_dialogue,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn into_story(self) -> Story {
        self.story
    }

    pub fn selected_chapter(&self) -> Option<&ChapterId> {
        self.selected_chapter.as_ref()
    }

    pub fn selected_dialogue_id(&self) -> Option<&DialogueId> {
        self.selected_dialogue.as_ref()
    }

    pub fn selected_dialogue(&self) -> Option<&Dialogue> {
        self.selected_dialogue
            .as_ref()
            .and_then(|id| self.story.dialogue(id.as_str()))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a chapter. Unknown ids leave the selection alone.
    pub fn select_chapter(&mut self, id: &str) -> bool {
        match self.story.chapter(id) {
            Some(chapter) => {
                self.selected_chapter = Some(chapter.id.clone());
                true
            }
            None => false,
        }
    }

    /// Select a dialogue and the chapter it belongs to.
    ///
    /// Unknown ids leave the selection alone and return `None`.
    pub fn jump_to(&mut self, id: &str) -> Option<&Dialogue> {
        let target = self.story.dialogue(id)?;
        self.selected_chapter = Some(target.chapter_id.clone());
        self.selected_dialogue = Some(target.id.clone());
        Some(target)
    }

    /// Dialogues of the selected chapter, in document order.
    pub fn chapter_dialogues(&self) -> Vec<&Dialogue> {
        match &self.selected_chapter {
            Some(chapter) => self.story.chapter_dialogues(chapter.as_str()),
            None => Vec::new(),
        }
    }

    /// Dialogues linking into the selected dialogue.
    pub fn backlinks(&self) -> Vec<&Dialogue> {
        match &self.selected_dialogue {
            Some(id) => self.story.backlinks(id.as_str()),
            None => Vec::new(),
        }
    }

    /// Label for the edge from `source` to `target`: automatic or option.
    pub fn link_kind(&self, source: &str, target: &str) -> Option<LinkKind> {
        GraphNavigator::new(&self.story).link_kind(source, target)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a new chapter and select it.
    pub fn add_chapter(&mut self) -> Result<ChapterId, DomainError> {
        let id = ChapterId::generate();
        self.story
            .add_chapter(Chapter::new(id.clone(), NEW_CHAPTER_TITLE))?;
        self.selected_chapter = Some(id.clone());
        tracing::debug!(chapter_id = %id, "Chapter added");
        Ok(id)
    }

    /// Append a new dialogue to the selected chapter and select it.
    pub fn add_dialogue(&mut self) -> Result<DialogueId, DomainError> {
        let chapter = self
            .selected_chapter
            .clone()
            .ok_or_else(|| DomainError::constraint("No chapter selected"))?;
        let id = DialogueId::generate();
        self.story
            .add_dialogue(Dialogue::new(id.clone(), chapter, NEW_DIALOGUE_TEXT))?;
        self.selected_dialogue = Some(id.clone());
        tracing::debug!(dialogue_id = %id, "Dialogue added");
        Ok(id)
    }

    /// Delete a dialogue, clearing every edge into it.
    pub fn delete_dialogue(&mut self, id: &str) -> Option<DialogueRemoved> {
        let removed = self.story.remove_dialogue(id)?;
        if self.selected_dialogue.as_ref().is_some_and(|s| s == id) {
            self.selected_dialogue = None;
        }
        tracing::info!(
            dialogue_id = %id,
            cleared_links = removed.cleared_links.len(),
            "Dialogue deleted"
        );
        Some(removed)
    }

    /// Append a default option to a dialogue; returns its index.
    pub fn add_option(&mut self, dialogue_id: &str) -> Result<usize, DomainError> {
        let mut index = 0;
        self.story.update_dialogue(dialogue_id, |d| {
            d.options.push(DialogueOption::default());
            index = d.options.len() - 1;
        })?;
        Ok(index)
    }

    /// Edit a dialogue in place; see [`Story::update_dialogue`].
    pub fn update_dialogue<F>(&mut self, id: &str, edit: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Dialogue),
    {
        self.story.update_dialogue(id, edit)
    }

    pub fn rename_chapter(&mut self, id: &str, title: impl Into<String>) -> Result<(), DomainError> {
        self.story.rename_chapter(id, title)
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), DomainError> {
        self.story.add_item(item)
    }

    pub fn remove_item(&mut self, id: &str) -> Option<ItemRemoved> {
        let removed = self.story.remove_item(id)?;
        if !removed.still_referenced_by.is_empty() {
            tracing::warn!(
                item_id = %id,
                dialogues = removed.still_referenced_by.len(),
                "Removed item is still referenced"
            );
        }
        Some(removed)
    }

    /// Integrity report for the story as it stands.
    pub fn integrity_report(&self, start_id: &str) -> IntegrityReport {
        IntegrityReport::build(&self.story, start_id)
    }
}
