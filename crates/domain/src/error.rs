//! Unified error types for the domain layer
//!
//! Only authoring operations that must reject input return these. Playback
//! never fails on dangling references or unknown tags; see the engine.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// An id is already taken within the story
    #[error("Duplicate {entity_type} id: {id}")]
    DuplicateId {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for tag enums)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for rejected authoring input.
    ///
    /// # Example
    /// ```ignore
    /// if id.is_empty() {
    ///     return Err(DomainError::validation("Dialogue id cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a duplicate id error
    pub fn duplicate_id(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("id cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: id cannot be empty");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Dialogue", "d_42");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Dialogue"));
        assert!(err.to_string().contains("d_42"));
    }

    #[test]
    fn test_duplicate_id_error() {
        let err = DomainError::duplicate_id("Chapter", "ch1");
        assert_eq!(err.to_string(), "Duplicate Chapter id: ch1");
    }
}
