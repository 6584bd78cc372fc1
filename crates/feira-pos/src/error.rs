//! # Application Error Type
//!
//! Unified error type for the service layer.
//!
//! ## Error Handling Strategy
//! Every error is scoped to the single user action that triggered it -
//! nothing here is fatal to the process. Validation failures are raised
//! before any store call; store failures abandon the action (the store's
//! atomic lifecycle operations mean there is no partial state to roll
//! back).

use thiserror::Error;

use feira_core::{CoreError, ValidationError};
use feira_store::StoreError;

/// Errors surfaced by the application service layer.
#[derive(Debug, Error)]
pub enum PosError {
    /// Business rule violation (empty cart, missing customer, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure (not found, backend error, ...).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unknown login or wrong password.
    ///
    /// One message for both cases; sign-in never reveals which part was
    /// wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Sellers are locked out while maintenance mode is on.
    #[error("System under maintenance")]
    Maintenance,

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<ValidationError> for PosError {
    fn from(err: ValidationError) -> Self {
        PosError::Core(CoreError::Validation(err))
    }
}

/// Result type for service-layer operations.
pub type PosResult<T> = Result<T, PosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_passes_through() {
        let err: PosError = CoreError::EmptyCart.into();
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_wraps_into_core() {
        let err: PosError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(err, PosError::Core(CoreError::Validation(_))));
    }
}
