//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies, plus
//! engine configuration.

pub mod clock;
pub mod config;
pub mod fs_store;
pub mod ports;
