//! # Cart Mutator
//!
//! Persisted cart mutations. Every operation runs the same three steps:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────┐     ┌──────────────┐
//! │ store.load() │ ──► │ Cart transition      │ ──► │ store.save() │ ──► CartUpdate
//! └──────────────┘     │ (munch-core, pure)   │     └──────────────┘
//!                      └──────────┬───────────┘
//!                                 │ rejected / conflict
//!                                 ▼
//!                        nothing is written
//! ```
//!
//! The result handed back is what was persisted; when the save fails the
//! in-memory result is dropped and the store keeps its previous value.

use munch_core::{AddOutcome, Cart, ItemChange, MenuItem, Vendor, VendorConflict};
use serde::Serialize;
use tracing::debug;

use crate::error::MutateResult;
use crate::store::CartStore;

/// The persisted cart after a mutation, plus what changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdate {
    pub cart: Cart,
    pub changes: Vec<ItemChange>,
}

impl CartUpdate {
    /// True when the operation changed nothing.
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Result of [`CartMutator::add_item`].
#[derive(Debug, Clone, PartialEq)]
pub enum AddResult {
    /// The item was added and the cart saved.
    Added(CartUpdate),
    /// The cart belongs to another vendor. Nothing was written; call
    /// [`CartMutator::resolve_conflict`] with the same vendor and item to
    /// replace the cart.
    Conflict(VendorConflict),
}

/// Applies cart transitions and persists the result.
///
/// ## Usage
/// ```rust,ignore
/// let mutator = CartMutator::new(store);
///
/// match mutator.add_item(&vendor, &item)? {
///     AddResult::Added(update) => render(update),
///     AddResult::Conflict(c) => {
///         if confirm_replace(&c) {
///             mutator.resolve_conflict(true, &vendor, &item)?;
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CartMutator<S> {
    store: S,
}

impl<S: CartStore> CartMutator<S> {
    /// Creates a mutator over a store.
    pub fn new(store: S) -> Self {
        CartMutator { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the current persisted cart.
    pub fn cart(&self) -> Cart {
        self.store.load()
    }

    /// Adds one unit of `item` from `vendor`.
    pub fn add_item(&self, vendor: &Vendor, item: &MenuItem) -> MutateResult<AddResult> {
        let mut cart = self.store.load();

        match cart.add_item(vendor, item)? {
            AddOutcome::Added(change) => {
                debug!(
                    vendor_id = %vendor.id,
                    item_id = %item.id,
                    quantity = change.quantity,
                    "Item added to cart"
                );
                self.commit(cart, vec![change]).map(AddResult::Added)
            }
            AddOutcome::Conflict(conflict) => {
                debug!(
                    existing_vendor = %conflict.existing.vendor_id,
                    incoming_vendor = %conflict.incoming.vendor_id,
                    item_id = %item.id,
                    "Vendor conflict, cart unchanged"
                );
                Ok(AddResult::Conflict(conflict))
            }
        }
    }

    /// Answers a [`VendorConflict`].
    ///
    /// With `replace` the existing vendor cart is discarded and a new one
    /// holding only `item` at quantity 1 is saved in a single write.
    /// Without it nothing is written.
    pub fn resolve_conflict(
        &self,
        replace: bool,
        vendor: &Vendor,
        item: &MenuItem,
    ) -> MutateResult<CartUpdate> {
        let mut cart = self.store.load();

        if !replace {
            debug!(vendor_id = %vendor.id, item_id = %item.id, "Vendor conflict dismissed");
            return Ok(CartUpdate {
                cart,
                changes: Vec::new(),
            });
        }

        let changes = cart.replace_with(vendor, item)?;
        debug!(
            vendor_id = %vendor.id,
            item_id = %item.id,
            discarded = changes.len() - 1,
            "Cart replaced with new vendor"
        );
        self.commit(cart, changes)
    }

    /// Removes one unit, cascading to item and vendor removal at zero.
    pub fn decrement_item(&self, vendor_id: &str, item_id: &str) -> MutateResult<CartUpdate> {
        let mut cart = self.store.load();
        let change = cart.decrement_item(vendor_id, item_id)?;

        debug!(vendor_id, item_id, quantity = change.quantity, "Item decremented");
        self.commit(cart, vec![change])
    }

    /// Sets an explicit quantity; `quantity < 1` is rejected.
    pub fn set_quantity(
        &self,
        vendor_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> MutateResult<CartUpdate> {
        let mut cart = self.store.load();

        match cart.set_quantity(vendor_id, item_id, quantity)? {
            Some(change) => {
                debug!(vendor_id, item_id, quantity, "Item quantity set");
                self.commit(cart, vec![change])
            }
            None => Ok(CartUpdate {
                cart,
                changes: Vec::new(),
            }),
        }
    }

    /// Removes an item regardless of its quantity.
    pub fn remove_item(&self, vendor_id: &str, item_id: &str) -> MutateResult<CartUpdate> {
        let mut cart = self.store.load();
        let change = cart.remove_item(vendor_id, item_id)?;

        debug!(vendor_id, item_id, "Item removed from cart");
        self.commit(cart, vec![change])
    }

    /// Empties the cart.
    pub fn clear(&self) -> MutateResult<CartUpdate> {
        let mut cart = self.store.load();
        let changes = cart.clear();

        self.store.clear()?;
        debug!(discarded = changes.len(), "Cart cleared");
        Ok(CartUpdate { cart, changes })
    }

    fn commit(&self, cart: Cart, changes: Vec<ItemChange>) -> MutateResult<CartUpdate> {
        self.store.save(&cart)?;
        Ok(CartUpdate { cart, changes })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::error::{MutateError, StoreError, StoreResult};
    use crate::store::{JsonCartStore, CART_KEY};
    use munch_core::projector::{grand_total, vendor_total};
    use munch_core::{ChangeKind, CoreError, Money, ValidationError};

    fn setup() -> (CartMutator<JsonCartStore<MemoryBackend>>, MemoryBackend) {
        let backend = MemoryBackend::new();
        (CartMutator::new(JsonCartStore::new(backend.clone())), backend)
    }

    fn v1() -> Vendor {
        Vendor::new("v1", "Dosa Corner")
    }

    fn i1() -> MenuItem {
        MenuItem::new("i1", "Masala Dosa", Money::from_major(100))
    }

    fn added(result: AddResult) -> CartUpdate {
        match result {
            AddResult::Added(update) => update,
            AddResult::Conflict(c) => panic!("unexpected conflict: {:?}", c),
        }
    }

    #[test]
    fn test_add_to_empty_cart() {
        let (mutator, backend) = setup();

        let update = added(mutator.add_item(&v1(), &i1()).unwrap());

        assert_eq!(update.changes[0].kind, ChangeKind::Added);
        let stored: serde_json::Value =
            serde_json::from_str(&backend.raw(CART_KEY).unwrap()).unwrap();
        assert_eq!(stored["v1"]["items"]["i1"]["quantity"], 1);
        assert_eq!(mutator.cart(), update.cart);
    }

    #[test]
    fn test_add_decrement_sequence() {
        let (mutator, backend) = setup();

        mutator.add_item(&v1(), &i1()).unwrap();
        let update = added(mutator.add_item(&v1(), &i1()).unwrap());
        assert_eq!(update.cart.item("v1", "i1").unwrap().quantity, 2);
        assert_eq!(
            vendor_total(update.cart.active_vendor().unwrap()),
            Money::from_major(200)
        );

        let update = mutator.decrement_item("v1", "i1").unwrap();
        assert_eq!(update.cart.item("v1", "i1").unwrap().quantity, 1);
        assert_eq!(grand_total(&mutator.cart()), Money::from_major(100));

        let update = mutator.decrement_item("v1", "i1").unwrap();
        assert_eq!(update.changes[0].kind, ChangeKind::Removed);
        assert!(update.cart.is_empty());
        assert!(mutator.cart().is_empty());
        assert_eq!(backend.raw(CART_KEY), None);
    }

    #[test]
    fn test_conflict_leaves_store_untouched_until_resolved() {
        let (mutator, backend) = setup();
        mutator.add_item(&v1(), &i1()).unwrap();
        let before = backend.raw(CART_KEY);

        let v2 = Vendor::new("v2", "Momo Hut");
        let m1 = MenuItem::new("m1", "Veg Momos", Money::from_major(80));

        let conflict = match mutator.add_item(&v2, &m1).unwrap() {
            AddResult::Conflict(c) => c,
            other => panic!("expected conflict, got {:?}", other),
        };
        assert_eq!(conflict.existing.vendor_id, "v1");
        assert_eq!(backend.raw(CART_KEY), before);

        let update = mutator.resolve_conflict(false, &v2, &m1).unwrap();
        assert!(update.is_unchanged());
        assert_eq!(backend.raw(CART_KEY), before);

        let update = mutator.resolve_conflict(true, &v2, &m1).unwrap();
        assert_eq!(update.cart.vendors().len(), 1);
        assert_eq!(update.cart.item("v2", "m1").unwrap().quantity, 1);
        assert!(mutator.cart().vendor("v1").is_none());
    }

    #[test]
    fn test_set_quantity_zero_is_rejected() {
        let (mutator, backend) = setup();
        mutator.add_item(&v1(), &i1()).unwrap();
        let before = backend.raw(CART_KEY);

        let err = mutator.set_quantity("v1", "i1", 0).unwrap_err();
        assert!(matches!(
            err,
            MutateError::Cart(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert_eq!(backend.raw(CART_KEY), before);

        let update = mutator.set_quantity("v1", "i1", 4).unwrap();
        assert_eq!(grand_total(&update.cart), Money::from_major(400));
        assert!(mutator.set_quantity("v1", "i1", 4).unwrap().is_unchanged());
    }

    #[test]
    fn test_oversized_prices_never_reach_totals() {
        let snapshot = r#"{"v1":{"vendorId":"v1","vendorName":"A","items":{"i1":{"itemId":"i1","name":"x","price":90000000000000000,"quantity":1}}}}"#;
        let backend = MemoryBackend::with_entry(CART_KEY, snapshot);
        let mutator = CartMutator::new(JsonCartStore::new(backend.clone()));

        assert!(mutator.cart().is_empty());
        assert!(matches!(
            mutator.set_quantity("v1", "i1", 2),
            Err(MutateError::Cart(CoreError::ItemNotInCart { .. }))
        ));
        assert_eq!(grand_total(&mutator.cart()), Money::zero());

        let pricey = MenuItem::new("i1", "x", Money::from_major(900_000_000_000_000));
        for _ in 0..2 {
            assert!(matches!(
                mutator.add_item(&v1(), &pricey),
                Err(MutateError::Cart(CoreError::Validation(ValidationError::OutOfRange { .. })))
            ));
        }
        assert_eq!(backend.raw(CART_KEY).as_deref(), Some(snapshot));
    }

    #[test]
    fn test_missing_item_is_rejected() {
        let (mutator, _) = setup();
        assert!(matches!(
            mutator.remove_item("v1", "i1"),
            Err(MutateError::Cart(CoreError::ItemNotInCart { .. }))
        ));
    }

    #[test]
    fn test_totals_track_persisted_cart() {
        let (mutator, _) = setup();
        let dosa = i1();
        let coffee = MenuItem::new("i2", "Filter Coffee", Money::from_major_minor(30, 50));

        mutator.add_item(&v1(), &dosa).unwrap();
        mutator.add_item(&v1(), &coffee).unwrap();
        mutator.add_item(&v1(), &coffee).unwrap();
        mutator.set_quantity("v1", "i1", 3).unwrap();
        mutator.decrement_item("v1", "i2").unwrap();

        let cart = mutator.cart();
        let expected: Money = cart
            .vendors()
            .iter()
            .flat_map(|v| v.items.iter())
            .map(|i| i.price * i.quantity)
            .sum();
        assert_eq!(grand_total(&cart), expected);
        assert_eq!(expected, Money::from_major_minor(330, 50));
    }

    #[test]
    fn test_clear_reports_discarded() {
        let (mutator, backend) = setup();
        mutator.add_item(&v1(), &i1()).unwrap();

        let update = mutator.clear().unwrap();
        assert_eq!(update.changes[0].kind, ChangeKind::Discarded);
        assert!(update.cart.is_empty());
        assert_eq!(backend.raw(CART_KEY), None);
    }

    /// Store that serves a fixed cart and refuses every write.
    struct ReadOnlyStore(Cart);

    impl CartStore for ReadOnlyStore {
        fn load(&self) -> Cart {
            self.0.clone()
        }

        fn save(&self, _cart: &Cart) -> StoreResult<()> {
            Err(StoreError::io(
                CART_KEY,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }

        fn clear(&self) -> StoreResult<()> {
            self.save(&Cart::new())
        }
    }

    #[test]
    fn test_store_failure_is_reported() {
        let mutator = CartMutator::new(ReadOnlyStore(Cart::new()));

        let err = mutator.add_item(&v1(), &i1()).unwrap_err();
        assert!(matches!(err, MutateError::Store(StoreError::Io { .. })));
        assert!(mutator.cart().is_empty());
    }
}
