//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Document storage (could swap a directory -> object storage)
//! - Clock (for testing)

mod error;
mod store;
mod testing;

pub use error::StoreError;
pub use store::StoryStore;
pub use testing::ClockPort;

#[cfg(test)]
pub use store::MockStoryStore;
#[cfg(test)]
pub use testing::MockClockPort;
