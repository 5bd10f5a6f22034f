//! Domain Events
//!
//! Return types from aggregate mutations, communicating what happened when
//! state was modified. Callers decide whether to log, display, or drop them.

pub mod player_events;
pub mod story_events;

pub use player_events::*;
pub use story_events::*;
