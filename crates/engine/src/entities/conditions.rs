//! Condition evaluator - decides which options a player can see and use.
//!
//! Evaluation is pure and total. Conditions with unset payload fields and
//! unrecognized kinds fail open (visible), so a half-authored option never
//! hides content.

use storyloom_domain::{Condition, DialogueOption, PlayerState};

use crate::infrastructure::config::{EngineConfig, FlagConditionMode};

/// Evaluates visibility conditions against a player.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionEvaluator {
    flag_mode: FlagConditionMode,
}

impl ConditionEvaluator {
    pub fn new(flag_mode: FlagConditionMode) -> Self {
        Self { flag_mode }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.flag_conditions)
    }

    pub fn flag_mode(&self) -> FlagConditionMode {
        self.flag_mode
    }

    /// Whether a single condition holds for the player.
    pub fn evaluate(&self, condition: &Condition, player: &PlayerState) -> bool {
        match condition {
            Condition::Always { .. } => true,
            Condition::HasItem { item_id, .. } => match item_id {
                Some(id) => player.has_item(id.as_str()),
                None => true,
            },
            Condition::StatGreater {
                stat_name,
                stat_value,
                ..
            } => match (stat_name, stat_value) {
                // A stat never touched compares as undefined: never greater.
                (Some(name), Some(threshold)) => player
                    .stat_value(name)
                    .is_some_and(|value| value > *threshold),
                _ => true,
            },
            Condition::FlagTrue { flag_name, .. } => match (self.flag_mode, flag_name) {
                (FlagConditionMode::Legacy, _) => true,
                (FlagConditionMode::Wired, Some(name)) => player.has_flag(name),
                (FlagConditionMode::Wired, None) => true,
            },
            Condition::Unrecognized(_) => {
                tracing::warn!(
                    kind = condition.kind(),
                    "Unknown visibility condition - treating as visible"
                );
                true
            }
        }
    }

    /// The option's fine-grained condition only.
    pub fn is_visible(&self, option: &DialogueOption, player: &PlayerState) -> bool {
        self.evaluate(&option.visibility_condition, player)
    }

    /// Shown to the player: coarse `visible` flag and condition both hold.
    pub fn is_presentable(&self, option: &DialogueOption, player: &PlayerState) -> bool {
        option.visible && self.is_visible(option, player)
    }

    /// Shown and interactive.
    pub fn is_actionable(&self, option: &DialogueOption, player: &PlayerState) -> bool {
        option.enabled && self.is_presentable(option, player)
    }
}
