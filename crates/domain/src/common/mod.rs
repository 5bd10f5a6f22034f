//! Common utility functions shared by the domain types.
//!
//! Pure functions only - no side effects, no I/O.

pub mod number;
pub mod string;

pub use number::{int_or_whole_float, opt_int_or_whole_float, whole_number};
pub use string::{empty_as_none, some_if_not_empty};
