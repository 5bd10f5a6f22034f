//! Story entities - plain data structs owned by the [`Story`](crate::Story) aggregate.
//!
//! Every entity keeps unknown JSON keys in an `extra` map so that documents
//! written by newer editors survive a load/save cycle.

mod chapter;
mod dialogue;
mod item;
mod mini_game;

pub use chapter::{Chapter, MAIN_CHAPTER_ID, MAIN_CHAPTER_TITLE, NEW_CHAPTER_TITLE};
pub use dialogue::{Dialogue, DialogueOption, MiniGameLink, NEW_DIALOGUE_TEXT, NEW_OPTION_TEXT};
pub use item::{Item, ItemType};
pub use mini_game::MiniGame;
