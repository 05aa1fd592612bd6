//! # munch-core: Pure Cart Logic for Mall Munch
//!
//! This crate is the **heart** of the Mall Munch cart. It holds the cart model
//! and every state transition as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mall Munch Cart Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              UI surfaces (menu view, cart view, CLI)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          munch-store (CartStore + CartMutator)                  │   │
//! │  │          munch-checkout (CheckoutCoordinator)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ munch-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ projector │  │   │
//! │  │   │ LineItem  │  │   Money   │  │   Cart    │  │  totals   │  │   │
//! │  │   │ MenuItem  │  │           │  │ VendorCart│  │  views    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Menu inputs and line items
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The single-vendor cart and its transitions
//! - [`projector`] - Totals and read-only views
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use munch_core::{Cart, MenuItem, Money, Vendor, projector};
//!
//! let vendor = Vendor::new("v1", "Dosa Corner");
//! let dosa = MenuItem::new("i1", "Masala Dosa", Money::from_major(100));
//!
//! let mut cart = Cart::new();
//! cart.add_item(&vendor, &dosa).unwrap();
//! cart.add_item(&vendor, &dosa).unwrap();
//!
//! assert_eq!(projector::grand_total(&cart), Money::from_major(200));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
mod keyed;
pub mod money;
pub mod projector;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, ChangeKind, ItemChange, VendorCart, VendorConflict, VendorRef};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use projector::{CartTotals, CartView, VendorTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct items allowed in a single vendor cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Maximum length of a vendor or item identifier.
pub const MAX_ID_LENGTH: usize = 64;

/// Maximum unit price of a menu item (₹10,00,000).
///
/// At this bound a full cart (100 items × 999 each) stays far inside `i64`
/// paise, so totals are exact.
pub const MAX_ITEM_PRICE: Money = Money::from_major(1_000_000);
