//! # Cart Store
//!
//! The persisted cart snapshot.
//!
//! ## Load Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  backend.read("cart")                                                  │
//! │       │                                                                 │
//! │       ├── key absent ─────────────────────────────► Cart::new()        │
//! │       ├── literal null ───────────────────────────► Cart::new()        │
//! │       ├── I/O error ──────────────── warn! ───────► Cart::new()        │
//! │       ├── not JSON / schema violation ── warn! ───► Cart::new()        │
//! │       └── valid snapshot ─────────────────────────► Cart               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loading never fails. Writing can, because a real disk can refuse it.

use std::sync::Arc;

use munch_core::Cart;
use tracing::{debug, warn};

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};

/// Storage key holding the cart snapshot.
pub const CART_KEY: &str = "cart";

// =============================================================================
// CartStore Contract
// =============================================================================

/// Durable home of the cart.
///
/// A `load` after a successful `save` always observes that save.
pub trait CartStore: Send + Sync {
    /// Returns the stored cart, or an empty cart when nothing usable is stored.
    fn load(&self) -> Cart;

    /// Replaces the stored cart. Saving an empty cart is the same as [`clear`].
    ///
    /// [`clear`]: CartStore::clear
    fn save(&self, cart: &Cart) -> StoreResult<()>;

    /// Removes the stored cart.
    fn clear(&self) -> StoreResult<()>;
}

impl<S: CartStore + ?Sized> CartStore for &S {
    fn load(&self) -> Cart {
        (**self).load()
    }

    fn save(&self, cart: &Cart) -> StoreResult<()> {
        (**self).save(cart)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

impl<S: CartStore + ?Sized> CartStore for Arc<S> {
    fn load(&self) -> Cart {
        (**self).load()
    }

    fn save(&self, cart: &Cart) -> StoreResult<()> {
        (**self).save(cart)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

// =============================================================================
// JSON Implementation
// =============================================================================

/// [`CartStore`] that keeps the cart as JSON under [`CART_KEY`].
#[derive(Debug, Clone, Default)]
pub struct JsonCartStore<B> {
    backend: B,
}

impl<B: StorageBackend> JsonCartStore<B> {
    /// Creates a store over a backend.
    pub fn new(backend: B) -> Self {
        JsonCartStore { backend }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn decode(raw: &str) -> Cart {
        match serde_json::from_str::<Option<Cart>>(raw) {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Stored cart is corrupt, starting with an empty cart");
                Cart::new()
            }
        }
    }
}

impl<B: StorageBackend> CartStore for JsonCartStore<B> {
    fn load(&self) -> Cart {
        match self.backend.read(CART_KEY) {
            Ok(Some(raw)) => Self::decode(&raw),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Stored cart is unreadable, starting with an empty cart");
                Cart::new()
            }
        }
    }

    fn save(&self, cart: &Cart) -> StoreResult<()> {
        if cart.is_empty() {
            return self.clear();
        }

        let raw = serde_json::to_string(cart)?;
        self.backend
            .write(CART_KEY, &raw)
            .map_err(|e| StoreError::io(CART_KEY, e))?;

        debug!(bytes = raw.len(), "Saved cart");
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.backend
            .remove(CART_KEY)
            .map_err(|e| StoreError::io(CART_KEY, e))?;

        debug!("Cleared cart");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
