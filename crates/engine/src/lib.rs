//! Storyloom Engine library.
//!
//! Loads branching story documents and plays or edits them.
//!
//! ## Structure
//!
//! - `migration/` - Upgrades legacy documents to the current schema
//! - `entities/` - Condition evaluation, action interpretation, graph traversal
//! - `use_cases/` - Playback, authoring, integrity checks, persistence
//! - `infrastructure/` - Configuration, clock and storage (ports + adapters)

pub mod entities;
pub mod error;
pub mod infrastructure;
pub mod migration;
pub mod use_cases;

/// End-to-end playback tests over complete documents.
#[cfg(test)]
mod e2e_tests;

pub use entities::{ConditionEvaluator, GraphNavigator};
pub use error::{LoadError, SaveError};
pub use infrastructure::config::{EngineConfig, FlagConditionMode};
pub use infrastructure::fs_store::FsStoryStore;
pub use use_cases::{load_story, save_story, EditorSession, IntegrityReport, PlaySession, StoryLibrary};
