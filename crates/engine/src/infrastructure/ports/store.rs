//! Storage port for serialized story documents.

use super::error::StoreError;

// =============================================================================
// Story Storage
// =============================================================================

/// Raw text storage keyed by document name (e.g. `"night-train.json"`).
///
/// The engine only ever hands this port serialized JSON and only ever
/// receives raw text back; buckets, URLs and retries live behind it.
#[cfg_attr(test, mockall::automock)]
pub trait StoryStore: Send + Sync {
    fn read(&self, name: &str) -> Result<String, StoreError>;
    fn write(&self, name: &str, contents: &str) -> Result<(), StoreError>;
    /// Stored document names, sorted.
    fn list(&self) -> Result<Vec<String>, StoreError>;
}
