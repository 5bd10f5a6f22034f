//! Playback use case - one player walking through one story.
//!
//! A [`PlaySession`] always holds a story with at least one dialogue; the
//! "nothing loaded" state is simply the absence of a session. Transitions:
//!
//! - `new` / `load_story`: any → at the first dialogue, fresh player
//! - `go_to`: at D → at target (self-loops allowed); a missing target is a no-op
//! - `reset`: at D → at the first dialogue, fresh player
//!
//! A dialogue with no edge and no actionable option is a dead end, not a
//! separate state.

use storyloom_domain::{
    Dialogue, DialogueId, DialogueOption, DialogueRemoved, GameSession, Item, MiniGameId,
    PlayerState, PlayerStateChange, Story,
};

use crate::entities::{ActionInterpreter, ConditionEvaluator, GraphNavigator, OptionTarget};
use crate::error::LoadError;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::ClockPort;

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// Now at `dialogue_id`; `changes` lists completion, chapter and entry effects
    Arrived {
        dialogue_id: DialogueId,
        changes: Vec<PlayerStateChange>,
    },
    /// Target does not exist; nothing changed
    Missing { dialogue_id: DialogueId },
}

impl NavigationOutcome {
    pub fn arrived(&self) -> bool {
        matches!(self, Self::Arrived { .. })
    }
}

/// A minigame fork waiting for its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMiniGame {
    pub mini_game_id: Option<MiniGameId>,
    pub on_win: Option<DialogueId>,
    pub on_lose: Option<DialogueId>,
}

/// Result reported by the host after running a minigame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiniGameResult {
    Won,
    Lost,
}

/// Result of choosing an option.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceOutcome {
    /// Actions ran, then the session navigated
    Navigated {
        action_changes: Vec<PlayerStateChange>,
        navigation: NavigationOutcome,
    },
    /// Actions ran; the destination now depends on [`PlaySession::resolve_mini_game`]
    MiniGamePending {
        action_changes: Vec<PlayerStateChange>,
        pending: PendingMiniGame,
    },
    /// Actions ran; the option leads nowhere
    Terminal {
        action_changes: Vec<PlayerStateChange>,
    },
    /// No option at this index
    NoSuchOption { index: usize },
    /// Option exists but is not shown to the player
    Hidden { index: usize },
    /// Option is shown but disabled
    Disabled { index: usize },
    /// The current dialogue was deleted; navigate somewhere first
    NoCurrentDialogue,
}

/// Result of reporting a minigame outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum MiniGameResolution {
    Navigated(NavigationOutcome),
    /// The fork has no dialogue for this result; the session stays put
    NoTarget { result: MiniGameResult },
    /// No minigame was pending
    NothingPending,
}

/// An option as offered to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleOption<'a> {
    /// Position in the dialogue's option list, as accepted by `choose_option`
    pub index: usize,
    pub option: &'a DialogueOption,
    /// False for options shown greyed out
    pub actionable: bool,
}

/// Live playback state over an owned story.
#[derive(Debug, Clone)]
pub struct PlaySession {
    story: Story,
    player: PlayerState,
    current: Option<DialogueId>,
    pending_mini_game: Option<PendingMiniGame>,
    config: EngineConfig,
    evaluator: ConditionEvaluator,
    interpreter: ActionInterpreter,
}

impl PlaySession {
    /// Start playing `story` at its first dialogue.
    pub fn new(story: Story, config: EngineConfig) -> Result<Self, LoadError> {
        ensure_playable(&story)?;
        let mut session = Self {
            story,
            player: PlayerState::new(),
            current: None,
            pending_mini_game: None,
            evaluator: ConditionEvaluator::from_config(&config),
            interpreter: ActionInterpreter::new(),
            config,
        };
        session.reset();
        Ok(session)
    }

    /// Replace the story and start over. On error the session is untouched.
    pub fn load_story(&mut self, story: Story) -> Result<(), LoadError> {
        ensure_playable(&story)?;
        self.story = story;
        self.reset();
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_dialogue_id(&self) -> Option<&DialogueId> {
        self.current.as_ref()
    }

    pub fn current_dialogue(&self) -> Option<&Dialogue> {
        self.current
            .as_ref()
            .and_then(|id| self.story.dialogue(id.as_str()))
    }

    pub fn pending_mini_game(&self) -> Option<&PendingMiniGame> {
        self.pending_mini_game.as_ref()
    }

    fn navigator(&self) -> GraphNavigator<'_> {
        GraphNavigator::new(&self.story)
    }

    // =========================================================================
    // Player queries
    // =========================================================================

    pub fn has_item(&self, item_id: &str) -> bool {
        self.player.has_item(item_id)
    }

    pub fn stat(&self, name: &str) -> i64 {
        self.player.stat(name)
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.player.has_flag(name)
    }

    /// Inventory resolved against the story's item catalogue.
    ///
    /// Ids with no catalogue entry are skipped.
    pub fn player_items(&self) -> Vec<&Item> {
        self.player
            .inventory()
            .iter()
            .filter_map(|id| self.story.item(id.as_str()))
            .collect()
    }

    /// Options of the current dialogue the player can see, in order.
    pub fn visible_options(&self) -> Vec<VisibleOption<'_>> {
        let Some(dialogue) = self.current_dialogue() else {
            return Vec::new();
        };
        dialogue
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| self.evaluator.is_presentable(option, &self.player))
            .map(|(index, option)| VisibleOption {
                index,
                option,
                actionable: option.enabled,
            })
            .collect()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Fresh player at the first dialogue.
    pub fn reset(&mut self) {
        self.player = PlayerState::with_stats(self.config.baseline_stats.0.iter().cloned());
        self.current = None;
        self.pending_mini_game = None;

        let first = self
            .story
            .first_dialogue(&self.config.start_dialogue_id)
            .map(|d| d.id.clone());
        if let Some(first) = first {
            self.go_to(first.as_str());
        }

        tracing::info!(
            title = %self.story.meta().title,
            dialogues = self.story.dialogues().len(),
            start = ?self.current,
            "Playback started"
        );
    }

    /// Move to `id` and apply arrival effects. A missing id changes nothing.
    pub fn go_to(&mut self, id: &str) -> NavigationOutcome {
        let navigator = GraphNavigator::new(&self.story);
        let Some(dialogue) = navigator.find_dialogue(id) else {
            tracing::warn!(dialogue_id = %id, "Navigation target missing - staying put");
            return NavigationOutcome::Missing {
                dialogue_id: DialogueId::new(id),
            };
        };

        let player = std::mem::take(&mut self.player);
        let batch = navigator.enter(dialogue, player);
        self.player = batch.player;
        self.current = Some(dialogue.id.clone());
        self.pending_mini_game = None;

        tracing::debug!(dialogue_id = %id, changes = batch.changes.len(), "Entered dialogue");
        NavigationOutcome::Arrived {
            dialogue_id: dialogue.id.clone(),
            changes: batch.changes,
        }
    }

    /// Choose option `index` of the current dialogue.
    ///
    /// The option must be presentable and enabled. Its actions run first,
    /// then its destination is followed.
    pub fn choose_option(&mut self, index: usize) -> ChoiceOutcome {
        let Some(dialogue) = self.current_dialogue() else {
            return ChoiceOutcome::NoCurrentDialogue;
        };
        let Some(option) = dialogue.options.get(index) else {
            return ChoiceOutcome::NoSuchOption { index };
        };
        if !self.evaluator.is_presentable(option, &self.player) {
            return ChoiceOutcome::Hidden { index };
        }
        if !option.enabled {
            return ChoiceOutcome::Disabled { index };
        }

        let option = option.clone();
        let player = std::mem::take(&mut self.player);
        let batch = self.interpreter.apply(&option.actions, player);
        self.player = batch.player;
        let action_changes = batch.changes;

        match GraphNavigator::resolve_option_target(&option) {
            OptionTarget::Dialogue(target) => ChoiceOutcome::Navigated {
                action_changes,
                navigation: self.go_to(target.as_str()),
            },
            OptionTarget::MiniGame { on_win, on_lose } => {
                let pending = PendingMiniGame {
                    mini_game_id: option.mini_game.as_ref().and_then(|g| g.id.clone()),
                    on_win: on_win.cloned(),
                    on_lose: on_lose.cloned(),
                };
                tracing::debug!(mini_game = ?pending.mini_game_id, "Minigame fork pending");
                self.pending_mini_game = Some(pending.clone());
                ChoiceOutcome::MiniGamePending {
                    action_changes,
                    pending,
                }
            }
            OptionTarget::Terminal => ChoiceOutcome::Terminal { action_changes },
        }
    }

    /// Follow the pending minigame fork for `result`.
    pub fn resolve_mini_game(&mut self, result: MiniGameResult) -> MiniGameResolution {
        let Some(pending) = self.pending_mini_game.take() else {
            return MiniGameResolution::NothingPending;
        };
        let target = match result {
            MiniGameResult::Won => pending.on_win,
            MiniGameResult::Lost => pending.on_lose,
        };
        match target {
            Some(target) => MiniGameResolution::Navigated(self.go_to(target.as_str())),
            None => {
                tracing::warn!(?result, "Minigame fork has no dialogue for this result");
                MiniGameResolution::NoTarget { result }
            }
        }
    }

    /// Delete a dialogue from the story being played.
    ///
    /// If it was the current dialogue the position becomes unset and the
    /// caller must navigate again.
    pub fn delete_dialogue(&mut self, id: &str) -> Option<DialogueRemoved> {
        let removed = self.story.remove_dialogue(id)?;
        if self.current.as_ref().is_some_and(|c| c == id) {
            self.current = None;
            self.pending_mini_game = None;
        }
        Some(removed)
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Freeze the current progress.
    pub fn snapshot(&self, story_id: &str, clock: &dyn ClockPort) -> GameSession {
        GameSession::new(
            story_id,
            self.player.clone(),
            self.current.clone(),
            clock.now(),
        )
    }

    /// Write the current progress into an existing snapshot.
    pub fn record(&self, session: &mut GameSession, clock: &dyn ClockPort) {
        session.record_progress(self.player.clone(), self.current.clone(), clock.now());
    }

    /// Resume from a snapshot without replaying arrival effects.
    ///
    /// A position that no longer exists falls back to the first dialogue.
    pub fn restore(&mut self, session: &GameSession) {
        self.player = session.player_state().clone();
        self.pending_mini_game = None;
        self.current = match session.current_dialogue_id() {
            Some(id) if self.story.contains_dialogue(id.as_str()) => Some(id.clone()),
            saved => {
                let fallback = self
                    .story
                    .first_dialogue(&self.config.start_dialogue_id)
                    .map(|d| d.id.clone());
                tracing::warn!(saved = ?saved, fallback = ?fallback, "Saved position missing");
                fallback
            }
        };
    }
}

fn ensure_playable(story: &Story) -> Result<(), LoadError> {
    if story.dialogues().is_empty() {
        return Err(LoadError::EmptyStory);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::config::FlagConditionMode;
    use chrono::Utc;
    use storyloom_domain::{Action, Chapter, Condition, MiniGameLink, StoryMeta};

    fn create_test_story() -> Story {
        let mut story = Story::new(StoryMeta::new("Cave"));
        story.add_chapter(Chapter::new("ch1", "Mouth")).unwrap();
        story.add_chapter(Chapter::new("ch2", "Depths")).unwrap();
        story
            .add_dialogue(
                Dialogue::new("start", "ch1", "A cave.")
                    .with_option(
                        DialogueOption::new("Take torch")
                            .with_actions(vec![Action::add_item("torch")])
                            .with_next("deep"),
                    )
                    .with_option(
                        DialogueOption::new("Crawl in the dark")
                            .with_condition(Condition::has_item("torch")),
                    )
                    .with_option(DialogueOption::new("Wait").with_enabled(false))
                    .with_option(
                        DialogueOption::new("Gamble")
                            .with_mini_game(MiniGameLink::new("dice", "deep", "start")),
                    )
                    .with_option(DialogueOption::new("Leave").with_next("gone")),
            )
            .unwrap();
        story
            .add_dialogue(
                Dialogue::new("deep", "ch2", "Deeper.")
                    .with_on_enter(vec![Action::stat_change("courage", 1)]),
            )
            .unwrap();
        story.add_item(Item::new("torch", "Torch")).unwrap();
        story
    }

    fn create_session() -> PlaySession {
        PlaySession::new(create_test_story(), EngineConfig::default()).unwrap()
    }

    mod loading {
        use super::*;

        #[test]
        fn starts_at_start_with_baseline_player() {
            let session = create_session();
            assert_eq!(session.current_dialogue_id().unwrap(), "start");
            assert!(session.player().has_completed("start"));
            assert_eq!(session.player().current_chapter().unwrap(), "ch1");
            assert_eq!(session.player().stat_value("charisma"), Some(0));
        }

        #[test]
        fn empty_story_is_rejected() {
            let err = PlaySession::new(Story::new(StoryMeta::default()), EngineConfig::default());
            assert!(matches!(err, Err(LoadError::EmptyStory)));
        }

        #[test]
        fn failed_reload_keeps_resident_story() {
            let mut session = create_session();
            session.go_to("deep");
            let result = session.load_story(Story::new(StoryMeta::default()));
            assert!(result.is_err());
            assert_eq!(session.story().meta().title, "Cave");
            assert_eq!(session.current_dialogue_id().unwrap(), "deep");
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn missing_target_is_silent_noop() {
            let mut session = create_session();
            let before = session.player().clone();
            let outcome = session.go_to("nowhere");
            assert!(!outcome.arrived());
            assert_eq!(session.current_dialogue_id().unwrap(), "start");
            assert_eq!(session.player(), &before);
        }

        #[test]
        fn entry_actions_run_on_every_visit() {
            let mut session = create_session();
            session.go_to("deep");
            session.go_to("deep");
            assert_eq!(session.stat("courage"), 2);
            assert_eq!(session.player().completed_dialogues().len(), 2);
        }

        #[test]
        fn reset_restores_fresh_player() {
            let mut session = create_session();
            session.choose_option(0);
            session.reset();
            assert!(session.player_items().is_empty());
            assert_eq!(session.current_dialogue_id().unwrap(), "start");
            assert_eq!(session.player().completed_dialogues().len(), 1);
        }
    }

    mod choices {
        use super::*;

        #[test]
        fn choice_runs_actions_then_navigates() {
            let mut session = create_session();
            let outcome = session.choose_option(0);
            match outcome {
                ChoiceOutcome::Navigated {
                    action_changes,
                    navigation,
                } => {
                    assert_eq!(action_changes.len(), 1);
                    assert!(navigation.arrived());
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
            assert_eq!(session.current_dialogue_id().unwrap(), "deep");
            assert_eq!(session.player_items()[0].name, "Torch");
        }

        #[test]
        fn hidden_and_disabled_options_are_rejected() {
            let mut session = create_session();
            assert_eq!(session.choose_option(1), ChoiceOutcome::Hidden { index: 1 });
            assert_eq!(session.choose_option(2), ChoiceOutcome::Disabled { index: 2 });
            assert_eq!(
                session.choose_option(9),
                ChoiceOutcome::NoSuchOption { index: 9 }
            );
            assert_eq!(session.current_dialogue_id().unwrap(), "start");
        }

        #[test]
        fn dangling_option_runs_actions_but_stays() {
            let mut session = create_session();
            let outcome = session.choose_option(4);
            assert!(matches!(
                outcome,
                ChoiceOutcome::Navigated { navigation: NavigationOutcome::Missing { .. }, .. }
            ));
            assert_eq!(session.current_dialogue_id().unwrap(), "start");
        }

        #[test]
        fn visible_options_report_actionability() {
            let session = create_session();
            let offered: Vec<(usize, bool)> = session
                .visible_options()
                .iter()
                .map(|o| (o.index, o.actionable))
                .collect();
            assert_eq!(offered, vec![(0, true), (2, false), (3, true), (4, true)]);
        }

        #[test]
        fn minigame_fork_waits_for_result() {
            let mut session = create_session();
            assert!(matches!(
                session.choose_option(3),
                ChoiceOutcome::MiniGamePending { .. }
            ));
            assert_eq!(session.current_dialogue_id().unwrap(), "start");

            let resolution = session.resolve_mini_game(MiniGameResult::Won);
            assert!(matches!(resolution, MiniGameResolution::Navigated(ref n) if n.arrived()));
            assert_eq!(session.current_dialogue_id().unwrap(), "deep");
            assert_eq!(
                session.resolve_mini_game(MiniGameResult::Lost),
                MiniGameResolution::NothingPending
            );
        }

        #[test]
        fn wired_flags_gate_options() {
            let mut story = create_test_story();
            story
                .update_dialogue("start", |d| {
                    d.options[0].visibility_condition = Condition::flag_true("brave")
                })
                .unwrap();
            let config = EngineConfig::default().with_flag_conditions(FlagConditionMode::Wired);
            let mut session = PlaySession::new(story, config).unwrap();
            assert_eq!(session.choose_option(0), ChoiceOutcome::Hidden { index: 0 });
        }
    }

    mod editing_while_playing {
        use super::*;

        #[test]
        fn deleting_current_dialogue_unsets_position() {
            let mut session = create_session();
            session.go_to("deep");
            assert!(session.delete_dialogue("deep").is_some());
            assert!(session.current_dialogue_id().is_none());
            assert_eq!(session.choose_option(0), ChoiceOutcome::NoCurrentDialogue);
            assert!(session.visible_options().is_empty());

            assert!(session.go_to("start").arrived());
        }
    }

    mod snapshots {
        use super::*;

        #[test]
        fn restore_resumes_without_replaying_effects() {
            let clock = FixedClock(Utc::now());
            let mut session = create_session();
            session.choose_option(0);
            let snapshot = session.snapshot("cave.json", &clock);
            assert_eq!(snapshot.created_at(), clock.0);

            let mut other = create_session();
            other.restore(&snapshot);
            assert_eq!(other.current_dialogue_id().unwrap(), "deep");
            assert_eq!(other.stat("courage"), 1);
            assert!(other.has_item("torch"));
        }

        #[test]
        fn missing_saved_position_falls_back_to_first() {
            let clock = FixedClock(Utc::now());
            let mut session = create_session();
            session.go_to("deep");
            let snapshot = session.snapshot("cave.json", &clock);

            session.delete_dialogue("deep");
            session.restore(&snapshot);
            assert_eq!(session.current_dialogue_id().unwrap(), "start");
        }

        #[test]
        fn record_updates_existing_snapshot() {
            let mut clock = FixedClock(Utc::now());
            let mut session = create_session();
            let mut snapshot = session.snapshot("cave.json", &clock);

            session.go_to("deep");
            clock.0 += chrono::Duration::seconds(30);
            session.record(&mut snapshot, &clock);
            assert_eq!(snapshot.current_dialogue_id().unwrap(), "deep");
            assert_eq!(snapshot.last_played(), clock.0);
        }
    }
}
