//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Returns domain events from mutations
//!
//! | Aggregate | Owns |
//! |-----------|------|
//! | [`Story`] | chapters, dialogues (arena + id index), items, minigames |
//! | [`PlayerState`] | inventory, stats, flags, progress |
//! | [`GameSession`] | a frozen `PlayerState`, position, bookmarks |

pub mod game_session;
pub mod player_state;
pub mod story;

pub use game_session::{GameBookmark, GameSession};
pub use player_state::{PlayerState, Progress, BASELINE_STATS};
pub use story::{outgoing_links, Link, LinkKind, Story};
