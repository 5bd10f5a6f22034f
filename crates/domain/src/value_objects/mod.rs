//! Value objects carried inside the story document.

mod action;
mod condition;
mod story_meta;

pub use action::Action;
pub use condition::Condition;
pub use story_meta::{StoryMeta, CURRENT_SCHEMA_VERSION, UNTITLED};
