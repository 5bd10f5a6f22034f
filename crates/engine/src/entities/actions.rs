//! Action interpreter - applies declarative actions to a player.
//!
//! The interpreter takes a [`PlayerState`] by value and hands back the
//! successor, so a state is never mutated while another owner can see it.
//! Actions run strictly in list order; later actions observe earlier ones.

use storyloom_domain::{Action, PlayerState, PlayerStateChange};

/// Result of running a list of actions.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionBatch {
    /// The player after every action ran
    pub player: PlayerState,
    /// One entry per action, in order
    pub changes: Vec<PlayerStateChange>,
}

impl ActionBatch {
    /// Number of actions skipped because they were not understood.
    pub fn ignored_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, PlayerStateChange::Ignored { .. }))
            .count()
    }
}

/// Applies [`Action`] lists to player state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionInterpreter;

impl ActionInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Run `actions` against `player` and return the new state.
    ///
    /// An empty list returns the player unchanged. Unrecognized actions are
    /// logged and skipped without aborting the rest of the batch.
    pub fn apply(&self, actions: &[Action], mut player: PlayerState) -> ActionBatch {
        let changes = actions
            .iter()
            .map(|action| apply_one(action, &mut player))
            .collect();
        let batch = ActionBatch { player, changes };

        if !batch.changes.is_empty() {
            tracing::debug!(
                total_actions = batch.changes.len(),
                ignored = batch.ignored_count(),
                score = batch.player.score(),
                "Actions applied"
            );
        }

        batch
    }
}

/// Convenience form of [`ActionInterpreter::apply`] that drops the change list.
pub fn apply_actions(actions: &[Action], player: PlayerState) -> PlayerState {
    ActionInterpreter.apply(actions, player).player
}

fn apply_one(action: &Action, player: &mut PlayerState) -> PlayerStateChange {
    match action {
        Action::AddItem { id, .. } => player.add_item(id.clone()),
        Action::RemoveItem { id, .. } => player.remove_item(id.clone()),
        Action::StatChange { stat, value, .. } => player.change_stat(stat, *value),
        Action::SetFlag { id, .. } => player.set_flag(id, true),
        Action::ClearFlag { id, .. } => player.set_flag(id, false),
        Action::AddScore { value, .. } => player.add_score(*value),
        Action::Unrecognized(raw) => {
            let kind = action.kind().to_string();
            tracing::warn!(kind = %kind, action = %raw, "Unknown action - skipped");
            PlayerStateChange::Ignored { kind }
        }
    }
}
