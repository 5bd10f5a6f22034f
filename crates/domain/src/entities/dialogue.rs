//! Dialogue entity - A node of the story graph
//!
//! Dialogues reference each other only by [`DialogueId`], never by value, so
//! cycles and back-edges need no special handling. Outgoing edges:
//!
//! - `nextDialogueId`: automatic, unconditional forward edge
//! - `options[].nextDialogueId`: player-chosen edges
//! - `options[].miniGame.onWinDialogueId` / `onLoseDialogueId`: forks resolved
//!   by an external minigame outcome

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::empty_as_none;
use crate::value_objects::{Action, Condition};
use storyloom_domain::{ChapterId, DialogueId, MiniGameId};

/// Text given to dialogues created from the editor.
pub const NEW_DIALOGUE_TEXT: &str = "Новый текст...";

/// Label given to options created from the editor.
pub const NEW_OPTION_TEXT: &str = "Новый вариант";

fn default_true() -> bool {
    true
}

/// A single node of the dialogue graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialogue {
    pub id: DialogueId,
    pub chapter_id: ChapterId,
    #[serde(default)]
    pub text: String,

    // Presentation references - opaque to the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_machine_character_rive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm_trigger_background_rive: Option<String>,

    /// Automatic forward edge
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_dialogue_id: Option<DialogueId>,
    #[serde(default)]
    pub options: Vec<DialogueOption>,
    /// Actions run every time this dialogue becomes current
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_enter: Vec<Action>,

    /// Fields this schema does not know, carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dialogue {
    pub fn new(
        id: impl Into<DialogueId>,
        chapter_id: impl Into<ChapterId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            chapter_id: chapter_id.into(),
            text: text.into(),
            background_image: None,
            character_image: None,
            state_machine_character_rive: None,
            sm_trigger_background_rive: None,
            next_dialogue_id: None,
            options: Vec::new(),
            on_enter: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_next(mut self, next: impl Into<DialogueId>) -> Self {
        self.next_dialogue_id = Some(next.into());
        self
    }

    pub fn with_option(mut self, option: DialogueOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_on_enter(mut self, actions: Vec<Action>) -> Self {
        self.on_enter = actions;
        self
    }

    /// True if this dialogue has any edge (automatic or option) into `target`.
    ///
    /// Minigame outcomes are not counted; they are forks, not links.
    pub fn links_to(&self, target: &DialogueId) -> bool {
        self.next_dialogue_id.as_ref() == Some(target)
            || self
                .options
                .iter()
                .any(|o| o.next_dialogue_id.as_ref() == Some(target))
    }
}

/// A player-chosen edge out of a dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueOption {
    #[serde(default)]
    pub text: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_dialogue_id: Option<DialogueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_game: Option<MiniGameLink>,
    /// Actions run when the option is chosen
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    /// Shown but non-interactive when false
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Coarse override; hidden when false regardless of the condition
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub visibility_condition: Condition,
    /// Fields this schema does not know, carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DialogueOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_dialogue_id: None,
            mini_game: None,
            actions: Vec::new(),
            enabled: true,
            visible: true,
            visibility_condition: Condition::always(),
            extra: Map::new(),
        }
    }

    pub fn with_next(mut self, next: impl Into<DialogueId>) -> Self {
        self.next_dialogue_id = Some(next.into());
        self
    }

    pub fn with_mini_game(mut self, link: MiniGameLink) -> Self {
        self.mini_game = Some(link);
        self
    }

    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.visibility_condition = condition;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

impl Default for DialogueOption {
    fn default() -> Self {
        Self::new(NEW_OPTION_TEXT)
    }
}

/// A fork resolved by a minigame result instead of a player choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniGameLink {
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

impl MiniGameLink {
    pub fn new(
        id: impl Into<MiniGameId>,
        on_win: impl Into<DialogueId>,
        on_lose: impl Into<DialogueId>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            on_win_dialogue_id: Some(on_win.into()),
            on_lose_dialogue_id: Some(on_lose.into()),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_defaults_fill_missing_flags() {
        let option: DialogueOption = serde_json::from_value(json!({"text": "Run"})).unwrap();
        assert!(option.enabled);
        assert!(option.visible);
        assert_eq!(option.visibility_condition, Condition::always());
        assert!(option.next_dialogue_id.is_none());
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = json!({
            "id": "a",
            "chapterId": "ch1",
            "text": "Hello",
            "options": [],
            "speaker": "Mina",
        });
        let dialogue: Dialogue = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(dialogue.extra.get("speaker"), Some(&json!("Mina")));
        assert_eq!(serde_json::to_value(&dialogue).unwrap(), raw);
    }

    #[test]
    fn cleared_edge_is_read_as_absent() {
        let dialogue: Dialogue = serde_json::from_value(json!({
            "id": "a",
            "chapterId": "ch1",
            "nextDialogueId": "",
        }))
        .unwrap();
        assert!(dialogue.next_dialogue_id.is_none());
    }

    #[test]
    fn links_to_checks_auto_and_option_edges() {
        let target = DialogueId::new("b");
        let auto = Dialogue::new("a", "ch1", "").with_next("b");
        let by_option =
            Dialogue::new("c", "ch1", "").with_option(DialogueOption::new("go").with_next("b"));
        let by_game = Dialogue::new("e", "ch1", "")
            .with_option(DialogueOption::new("play").with_mini_game(MiniGameLink::new("g", "b", "b")));

        assert!(auto.links_to(&target));
        assert!(by_option.links_to(&target));
        assert!(!by_game.links_to(&target));
    }
}
