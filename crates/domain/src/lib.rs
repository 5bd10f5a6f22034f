//! Storyloom domain - the document model of a branching story.
//!
//! Pure types and invariants only: no I/O, no logging. Behaviour that needs
//! configuration or diagnostics (migration, evaluation, playback) lives in
//! `storyloom-engine`.

extern crate self as storyloom_domain;

pub mod common;

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

// Re-export aggregates
pub use aggregates::{
    outgoing_links, GameBookmark, GameSession, Link, LinkKind, PlayerState, Progress, Story,
    BASELINE_STATS,
};

// Re-export entities (explicit list in entities/mod.rs)
pub use entities::{
    Chapter, Dialogue, DialogueOption, Item, ItemType, MiniGame, MiniGameLink, MAIN_CHAPTER_ID,
    MAIN_CHAPTER_TITLE, NEW_CHAPTER_TITLE, NEW_DIALOGUE_TEXT, NEW_OPTION_TEXT,
};

pub use error::DomainError;
pub use events::{ClearedLink, DialogueRemoved, ItemRemoved, PlayerStateChange};

// Re-export ID types
pub use ids::{ChapterId, DialogueId, ItemId, MiniGameId, SessionId};

// Re-export value objects
pub use value_objects::{Action, Condition, StoryMeta, CURRENT_SCHEMA_VERSION, UNTITLED};
