//! # Error Types
//!
//! Domain-specific error types for munch-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  munch-core errors (this file)                                         │
//! │  ├── CoreError        - Cart rule violations                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  munch-store errors                                                    │
//! │  └── StoreError / MutateError - Persistence failures                   │
//! │                                                                         │
//! │  munch-checkout errors                                                 │
//! │  └── CheckoutError    - Submission failures                            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → MutateError → ApiError → UI       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A vendor conflict is deliberately NOT an error: it is a decision point
//! returned as [`crate::AddOutcome::Conflict`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart rule violations.
///
/// Every variant leaves the cart exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The vendor or item is not in the cart.
    ///
    /// ## When This Occurs
    /// - Decrementing an item that was already removed on another screen
    /// - Setting the quantity of an item from a vendor the cart does not hold
    #[error("Item {item_id} from vendor {vendor_id} is not in the cart")]
    ItemNotInCart { vendor_id: String, item_id: String },

    /// Vendor cart has reached the maximum number of distinct items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an ItemNotInCart error.
    pub fn item_not_in_cart(vendor_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        CoreError::ItemNotInCart {
            vendor_id: vendor_id.into(),
            item_id: item_id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

    /// Amount must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Checkout was requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout was requested for a cart whose total is zero.
    #[error("Cart total must be greater than zero")]
    ZeroTotal,

    /// Checkout was requested without a credential.
    #[error("Please login to place an order")]
    MissingCredential,
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
        let err = CoreError::item_not_in_cart("v1", "i9");
        assert_eq!(err.to_string(), "Item i9 from vendor v1 is not in the cart");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
        assert_eq!(
            ValidationError::MissingCredential.to_string(),
            "Please login to place an order"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "item id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
