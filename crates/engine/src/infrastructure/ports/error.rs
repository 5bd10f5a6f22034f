//! Error types for port operations.

/// Story storage errors with context for debugging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No document stored under this name.
    #[error("Story not found: {name}")]
    NotFound { name: String },

    /// Underlying storage failed - includes operation name for tracing.
    #[error("Storage error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    /// Name cannot be used as a document key (empty, or contains a path separator).
    #[error("Invalid story name: {0:?}")]
    InvalidName(String),
}

impl StoreError {
    /// Create a NotFound error for a document name.
    pub fn not_found(name: impl ToString) -> Self {
        Self::NotFound {
            name: name.to_string(),
        }
    }

    /// Create an Io error with operation context.
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
