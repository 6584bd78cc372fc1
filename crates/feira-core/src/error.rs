//! # Error Types
//!
//! Domain-specific error types for feira-core.
//!
//! ## Error Hierarchy
//! ```text
//! feira-core errors (this file)
//! ├── CoreError        - Business rule violations
//! └── ValidationError  - Input validation failures
//!
//! feira-store errors (separate crate)
//! └── StoreError       - Persistence failures
//!
//! feira-pos errors (application layer)
//! └── PosError         - What callers see
//!
//! Flow: ValidationError → CoreError → StoreError → PosError → Caller
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, sale id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Sale cannot be found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Customer cannot be found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// The cart has no line items; a sale cannot be committed from it.
    #[error("Cart is empty")]
    EmptyCart,

    /// A credit ("fiado") sale requires a customer to charge it to.
    ///
    /// This is checked before anything is persisted, so a rejected
    /// checkout leaves stock and crate balances untouched.
    #[error("A customer must be selected for a credit sale")]
    CustomerRequired,

    /// Product has no stock on hand.
    ///
    /// Soft check at cart time only: a product that IS in stock may still
    /// be sold past its stock count, and stock may go negative on commit.
    #[error("Product out of stock: {name}")]
    OutOfStock { name: String },

    /// Cart line index out of bounds.
    #[error("No cart line at index {index}")]
    LineNotFound { index: usize },

    /// Product is not in the cart.
    #[error("Product {0} not in cart")]
    ProductNotInCart(String),

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid username).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfStock {
            name: "Abacaxi Pérola".to_string(),
        };
        assert_eq!(err.to_string(), "Product out of stock: Abacaxi Pérola");

        let err = CoreError::CustomerRequired;
        assert_eq!(
            err.to_string(),
            "A customer must be selected for a credit sale"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
