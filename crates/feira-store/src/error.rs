//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! Backend failure (serde_json / std::io / sqlx)
//!      │
//!      ▼
//! StoreError (this module) ← adds entity context
//!      │
//!      ▼
//! PosError (in feira-pos) ← what callers see
//! ```

use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in the store.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Entity is not in a status that allows the requested operation
    /// (e.g., marking a cancelled sale as paid).
    #[error("Sale {id} is {status}, cannot perform operation")]
    InvalidStatus { id: String, status: String },

    /// JSON (de)serialization of the snapshot file failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file could not be read or written.
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure (SQL error, corrupt row, ...).
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("Sale", "abc-123");
        assert_eq!(err.to_string(), "Sale not found: abc-123");

        let err = StoreError::InvalidStatus {
            id: "abc-123".to_string(),
            status: "CANCELLED".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Sale abc-123 is CANCELLED, cannot perform operation"
        );
    }
}
