//! # Validation Module
//!
//! Input validation for cart operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI                                                           │
//! │  └── Disabled "-" button at quantity 1, disabled checkout when empty   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── The cart never trusts Layer 1: every caller is checked here       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Load-time schema checks (munch-store)                        │
//! │  └── Corrupt snapshots fall back to an empty cart                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use munch_core::validation::{validate_id, validate_quantity};
//!
//! validate_id("item id", "i1").unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{MenuItem, Vendor};
use crate::{MAX_ID_LENGTH, MAX_ITEM_PRICE, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a vendor or item identifier.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_ID_LENGTH`] characters
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.chars().count() > MAX_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LENGTH,
        });
    }

    Ok(())
}

/// Validates an item display name (must not be blank).
pub fn validate_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested quantity and narrows it to `u32`.
///
/// ## Rules
/// - Must be at least 1 (an item at quantity 0 is removed, never stored)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
///
/// ```text
/// set_quantity(v1, i1, n)
///      │
///      ├── n < 1?   → OutOfRange, cart untouched
///      ├── n > 999? → OutOfRange, cart untouched
///      └── OK       → quantity = n
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    if qty < 1 || qty > i64::from(MAX_ITEM_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }
    // Range-checked above.
    Ok(qty as u32)
}

/// Validates a price: zero (free items) up to [`MAX_ITEM_PRICE`].
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    if price > MAX_ITEM_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_ITEM_PRICE.major(),
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates the inputs of an add-to-cart request.
pub fn validate_addition(vendor: &Vendor, item: &MenuItem) -> ValidationResult<()> {
    validate_id("vendor id", &vendor.id)?;
    validate_id("item id", &item.id)?;
    validate_name(&item.name)?;
    validate_price(item.price)
}

// =============================================================================
// Unit Tests
// =============================================================================
