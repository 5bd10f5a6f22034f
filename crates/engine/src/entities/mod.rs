//! Entity modules - story graph capabilities.
//!
//! Each module wraps one concern over the domain model. They are pure (no
//! I/O) and provide the building blocks for the use cases.

pub mod actions;
pub mod conditions;
pub mod navigator;

pub use actions::{apply_actions, ActionBatch, ActionInterpreter};
pub use conditions::ConditionEvaluator;
pub use navigator::{GraphNavigator, OptionTarget};
