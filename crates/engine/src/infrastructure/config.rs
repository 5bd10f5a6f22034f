//! Engine configuration
//!
//! Every field has a default so the engine works without any environment.
//! `from_env` overrides individual fields; unparseable values fall back to
//! the default instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use storyloom_domain::{DomainError, BASELINE_STATS};

/// Dialogue id playback starts from when present.
pub const DEFAULT_START_DIALOGUE_ID: &str = "start";

/// How `flag_true` visibility conditions are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagConditionMode {
    /// Always satisfied, matching documents authored against the editor preview
    #[default]
    Legacy,
    /// Satisfied only when `flags[flagName] == true`
    Wired,
}

impl FlagConditionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Wired => "wired",
        }
    }
}

impl fmt::Display for FlagConditionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagConditionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "wired" => Ok(Self::Wired),
            other => Err(DomainError::parse(format!(
                "Unknown flag condition mode: {other}"
            ))),
        }
    }
}

/// Stat names as a comma-separated list, e.g. `knowledge,courage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatList(pub Vec<String>);

impl FromStr for StatList {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            s.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

/// All configurable engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Dialogue playback starts from; the first dialogue is used when absent
    pub start_dialogue_id: String,
    /// Stats every fresh player carries at 0
    pub baseline_stats: StatList,
    pub flag_conditions: FlagConditionMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_dialogue_id: DEFAULT_START_DIALOGUE_ID.to_string(),
            baseline_stats: StatList(BASELINE_STATS.iter().map(|s| s.to_string()).collect()),
            flag_conditions: FlagConditionMode::Legacy,
        }
    }
}

impl EngineConfig {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            start_dialogue_id: env_or("STORYLOOM_START_DIALOGUE", defaults.start_dialogue_id),
            baseline_stats: env_or("STORYLOOM_BASELINE_STATS", defaults.baseline_stats),
            flag_conditions: env_or("STORYLOOM_FLAG_CONDITIONS", defaults.flag_conditions),
        }
    }

    pub fn with_flag_conditions(mut self, mode: FlagConditionMode) -> Self {
        self.flag_conditions = mode;
        self
    }

    pub fn with_start_dialogue_id(mut self, id: impl Into<String>) -> Self {
        self.start_dialogue_id = id.into();
        self
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
