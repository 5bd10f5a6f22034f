//! Engine error types.
//!
//! Only unrecoverable load and save failures are errors. Dangling references
//! and unknown condition/action kinds are logged and surfaced as absent
//! values or outcome enums instead.

use thiserror::Error;

use crate::infrastructure::ports::StoreError;

/// A document could not be turned into a [`Story`](storyloom_domain::Story).
///
/// A failed load never touches a story that is already resident.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input is not valid JSON
    #[error("Story is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Input has no `dialogues` key at all
    #[error("Story has no dialogues list")]
    MissingDialogues,

    /// `dialogues` is present but empty
    #[error("Story has no dialogues")]
    EmptyStory,

    /// A field has a JSON type the model cannot hold (e.g. `"text": 5`)
    #[error("Story does not match the schema: {0}")]
    Schema(String),

    /// Storage collaborator failed before any parsing happened
    #[error("Failed to read story: {0}")]
    Store(#[from] StoreError),
}

impl LoadError {
    pub fn schema(message: impl ToString) -> Self {
        Self::Schema(message.to_string())
    }
}

/// A story could not be serialized or handed to storage.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to serialize story: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write story: {0}")]
    Store(#[from] StoreError),
}
