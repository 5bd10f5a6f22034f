//! End-to-end tests over complete story documents.
//!
//! Each test starts from document text, goes through the same load path a
//! host application uses, then plays, edits or saves the result.
//!
//! ```bash
//! cargo test -p storyloom-engine --lib e2e_tests
//! ```

mod e2e_helpers;
mod gameplay_flow_tests;

pub use e2e_helpers::*;
