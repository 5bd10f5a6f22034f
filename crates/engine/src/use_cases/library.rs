//! Story library - the persistence boundary.
//!
//! `load_story`/`save_story` convert between document text and a [`Story`];
//! [`StoryLibrary`] pairs them with a [`StoryStore`] so callers deal in file
//! names only.

use std::sync::Arc;

use serde_json::Value;

use storyloom_domain::Story;

use crate::error::{LoadError, SaveError};
use crate::infrastructure::ports::{ClockPort, StoryStore};
use crate::migration::migrate;

const JSON_EXTENSION: &str = ".json";

/// Parse, migrate and check a story document.
///
/// Fails on invalid JSON, a missing `dialogues` list, a mistyped field, or a
/// story that ends up with no dialogues.
pub fn load_story(text: &str) -> Result<Story, LoadError> {
    let raw: Value = serde_json::from_str(text)?;
    if raw.get("dialogues").map_or(true, Value::is_null) {
        return Err(LoadError::MissingDialogues);
    }

    let story = migrate(raw)?;
    if story.dialogues().is_empty() {
        return Err(LoadError::EmptyStory);
    }

    tracing::info!(
        title = %story.meta().title,
        chapters = story.chapters().len(),
        dialogues = story.dialogues().len(),
        items = story.items().len(),
        "Story loaded"
    );
    Ok(story)
}

/// Serialize a story as 2-space pretty JSON.
pub fn save_story(story: &Story) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(story)?)
}

/// Trim a user-entered name and make sure it ends in `.json`.
pub fn normalize_file_name(name: &str) -> String {
    let name = name.trim();
    if name.ends_with(JSON_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{JSON_EXTENSION}")
    }
}

/// `<base>_copy_<timestamp>.json` for a copy of `current`.
pub fn copy_file_name(current: &str, timestamp_millis: i64) -> String {
    let base = current.strip_suffix(JSON_EXTENSION).unwrap_or(current);
    format!("{base}_copy_{timestamp_millis}{JSON_EXTENSION}")
}

/// Named stories in a [`StoryStore`].
#[derive(Clone)]
pub struct StoryLibrary {
    store: Arc<dyn StoryStore>,
    clock: Arc<dyn ClockPort>,
}

impl StoryLibrary {
    pub fn new(store: Arc<dyn StoryStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub fn load(&self, name: &str) -> Result<Story, LoadError> {
        let name = normalize_file_name(name);
        let text = self.store.read(&name)?;
        load_story(&text).inspect_err(|e| {
            tracing::warn!(file = %name, error = %e, "Story failed to load");
        })
    }

    /// Save under `name`; returns the normalized name written.
    pub fn save(&self, name: &str, story: &Story) -> Result<String, SaveError> {
        let name = normalize_file_name(name);
        let text = save_story(story)?;
        self.store.write(&name, &text)?;
        tracing::info!(file = %name, "Story saved");
        Ok(name)
    }

    /// Save a timestamped copy next to `current`; returns the copy's name.
    pub fn save_copy(&self, current: &str, story: &Story) -> Result<String, SaveError> {
        let name = copy_file_name(current.trim(), self.clock.now().timestamp_millis());
        self.save(&name, story)
    }

    pub fn list(&self) -> Result<Vec<String>, LoadError> {
        Ok(self.store.list()?)
    }
}
