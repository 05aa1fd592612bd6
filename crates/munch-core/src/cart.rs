//! # Cart Module
//!
//! The single-vendor cart and its pure state transitions.
//!
//! ## Cart Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart  (vendor id → VendorCart, insertion order, at most ONE vendor)    │
//! │  └── VendorCart "v1"  (Dosa Corner)                                     │
//! │      ├── LineItem "i1"  Masala Dosa   ₹100 × 2                          │
//! │      └── LineItem "i7"  Filter Coffee ₹30 × 1                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants (enforced by every transition AND on deserialization)
//! - At most one vendor cart exists at any time
//! - Every quantity is between 1 and [`crate::MAX_ITEM_QUANTITY`]
//! - A vendor cart with no items is removed immediately
//! - An empty cart has no residual vendor entries
//!
//! ## Transitions
//! ```text
//!                add_item (same vendor / empty)
//!   ┌───────┐ ─────────────────────────────────► ┌──────────┐
//!   │ Empty │                                    │  Active  │ ◄──┐ add_item, set_quantity,
//!   └───────┘ ◄───────────────────────────────── └──────────┘ ───┘ decrement (qty > 1)
//!              decrement / remove of last item         │
//!              clear                                   │ add_item (other vendor)
//!                                                      ▼
//!                                          AddOutcome::Conflict (no change)
//!                                                      │ replace_with
//!                                                      ▼
//!                                            Active (new vendor only)
//! ```
//!
//! Each transition reports the [`ItemChange`]s it made so UI surfaces can
//! reconcile without diffing whole carts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::keyed::{self, Keyed};
use crate::types::{LineItem, MenuItem, Vendor};
use crate::validation::{self, validate_addition, validate_quantity};
use crate::MAX_CART_ITEMS;

// =============================================================================
// Item Changes
// =============================================================================

/// What happened to a line item during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum ChangeKind {
    /// Newly inserted at quantity 1.
    Added,
    /// Quantity increased by one.
    Incremented,
    /// Quantity decreased by one.
    Decremented,
    /// Quantity set to an explicit value.
    QuantitySet,
    /// Removed by decrement-to-zero or explicit removal.
    Removed,
    /// Dropped because the whole cart was replaced or cleared.
    Discarded,
}

/// A single line item that a transition touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemChange {
    pub vendor_id: String,
    pub item_id: String,
    pub kind: ChangeKind,
    /// Quantity after the change; 0 when the item left the cart.
    pub quantity: u32,
}

impl ItemChange {
    fn new(vendor_id: &str, item_id: &str, kind: ChangeKind, quantity: u32) -> Self {
        ItemChange {
            vendor_id: vendor_id.to_string(),
            item_id: item_id.to_string(),
            kind,
            quantity,
        }
    }
}

// =============================================================================
// Vendor Conflict
// =============================================================================

/// Identity of a vendor as shown in the "start a new order?" prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRef {
    pub vendor_id: String,
    pub vendor_name: String,
}

/// Decision point returned when adding from a second vendor.
///
/// The cart is untouched. The caller either drops the request or resolves
/// it by replacing the cart with the incoming item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorConflict {
    /// Vendor that currently owns the cart.
    pub existing: VendorRef,
    /// Vendor the patron tried to add from.
    pub incoming: VendorRef,
}

/// Result of [`Cart::add_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The item was added or its quantity bumped.
    Added(ItemChange),
    /// The cart belongs to another vendor; nothing changed.
    Conflict(VendorConflict),
}

// =============================================================================
// Vendor Cart
// =============================================================================

/// One vendor's items, keyed by item id in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCart {
    #[serde(alias = "foodCartId")]
    pub vendor_id: String,

    #[serde(default, alias = "foodCartName")]
    pub vendor_name: String,

    #[serde(with = "keyed")]
    pub items: Vec<LineItem>,
}

impl VendorCart {
    fn start(vendor: &Vendor, first: LineItem) -> Self {
        VendorCart {
            vendor_id: vendor.id.clone(),
            vendor_name: vendor.display_name(),
            items: vec![first],
        }
    }

    /// Looks up an item by id.
    pub fn item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Returns the vendor identity.
    pub fn vendor_ref(&self) -> VendorRef {
        VendorRef {
            vendor_id: self.vendor_id.clone(),
            vendor_name: self.vendor_name.clone(),
        }
    }
}

impl Keyed for VendorCart {
    fn key(&self) -> &str {
        &self.vendor_id
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The order in progress.
///
/// Serialized as a JSON object `vendorId → VendorCart`; an empty cart
/// serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    vendors: Vec<VendorCart>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    /// Vendor carts in insertion order.
    pub fn vendors(&self) -> &[VendorCart] {
        &self.vendors
    }

    /// The vendor cart currently holding the order, if any.
    pub fn active_vendor(&self) -> Option<&VendorCart> {
        self.vendors.first()
    }

    /// Looks up a vendor cart by vendor id.
    pub fn vendor(&self, vendor_id: &str) -> Option<&VendorCart> {
        self.vendors.iter().find(|v| v.vendor_id == vendor_id)
    }

    /// Looks up a line item.
    pub fn item(&self, vendor_id: &str, item_id: &str) -> Option<&LineItem> {
        self.vendor(vendor_id).and_then(|v| v.item(item_id))
    }

    /// Adds one unit of a menu item.
    ///
    /// ## Behavior
    /// - Empty cart: start a vendor cart with the item at quantity 1
    /// - Same vendor: bump the existing item, or insert it at quantity 1
    /// - Different vendor: no change, returns [`AddOutcome::Conflict`]
    pub fn add_item(&mut self, vendor: &Vendor, item: &MenuItem) -> CoreResult<AddOutcome> {
        validate_addition(vendor, item)?;

        let Some(vi) = self.vendors.iter().position(|v| v.vendor_id == vendor.id) else {
            if let Some(active) = self.vendors.first() {
                return Ok(AddOutcome::Conflict(VendorConflict {
                    existing: active.vendor_ref(),
                    incoming: VendorRef {
                        vendor_id: vendor.id.clone(),
                        vendor_name: vendor.display_name(),
                    },
                }));
            }
            self.vendors
                .push(VendorCart::start(vendor, LineItem::from_menu_item(item)));
            return Ok(AddOutcome::Added(ItemChange::new(
                &vendor.id,
                &item.id,
                ChangeKind::Added,
                1,
            )));
        };
        let existing = &mut self.vendors[vi];

        if let Some(line) = existing.items.iter_mut().find(|i| i.item_id == item.id) {
            let new_qty = validate_quantity(i64::from(line.quantity) + 1)?;
            line.quantity = new_qty;
            return Ok(AddOutcome::Added(ItemChange::new(
                &vendor.id,
                &item.id,
                ChangeKind::Incremented,
                new_qty,
            )));
        }

        if existing.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        existing.items.push(LineItem::from_menu_item(item));
        Ok(AddOutcome::Added(ItemChange::new(
            &vendor.id,
            &item.id,
            ChangeKind::Added,
            1,
        )))
    }

    /// Discards every vendor cart and starts over with `item` at quantity 1.
    ///
    /// This is the "start new order from this cart" resolution of a
    /// [`VendorConflict`]. Returns the discarded items followed by the
    /// added one.
    pub fn replace_with(&mut self, vendor: &Vendor, item: &MenuItem) -> CoreResult<Vec<ItemChange>> {
        validate_addition(vendor, item)?;

        let mut changes = self.clear();
        self.vendors
            .push(VendorCart::start(vendor, LineItem::from_menu_item(item)));
        changes.push(ItemChange::new(&vendor.id, &item.id, ChangeKind::Added, 1));
        Ok(changes)
    }

    /// Removes one unit; at quantity 1 the item is removed entirely.
    pub fn decrement_item(&mut self, vendor_id: &str, item_id: &str) -> CoreResult<ItemChange> {
        let (vi, ii) = self.locate(vendor_id, item_id)?;
        let line = &mut self.vendors[vi].items[ii];

        if line.quantity > 1 {
            line.quantity -= 1;
            return Ok(ItemChange::new(
                vendor_id,
                item_id,
                ChangeKind::Decremented,
                line.quantity,
            ));
        }

        Ok(self.remove_at(vi, ii))
    }

    /// Sets an explicit quantity.
    ///
    /// Quantities below 1 are rejected, never treated as removal. Returns
    /// `None` when the item already had that quantity.
    pub fn set_quantity(
        &mut self,
        vendor_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> CoreResult<Option<ItemChange>> {
        let quantity = validate_quantity(quantity)?;
        let (vi, ii) = self.locate(vendor_id, item_id)?;
        let line = &mut self.vendors[vi].items[ii];

        if line.quantity == quantity {
            return Ok(None);
        }

        line.quantity = quantity;
        Ok(Some(ItemChange::new(
            vendor_id,
            item_id,
            ChangeKind::QuantitySet,
            quantity,
        )))
    }

    /// Removes an item regardless of its quantity.
    pub fn remove_item(&mut self, vendor_id: &str, item_id: &str) -> CoreResult<ItemChange> {
        let (vi, ii) = self.locate(vendor_id, item_id)?;
        Ok(self.remove_at(vi, ii))
    }

    /// Empties the cart, reporting every item as discarded.
    pub fn clear(&mut self) -> Vec<ItemChange> {
        self.vendors
            .drain(..)
            .flat_map(|vendor| {
                let vendor_id = vendor.vendor_id;
                vendor.items.into_iter().map(move |item| {
                    ItemChange::new(&vendor_id, &item.item_id, ChangeKind::Discarded, 0)
                })
            })
            .collect()
    }

    fn locate(&self, vendor_id: &str, item_id: &str) -> CoreResult<(usize, usize)> {
        self.vendors
            .iter()
            .enumerate()
            .filter(|(_, v)| v.vendor_id == vendor_id)
            .find_map(|(vi, v)| {
                v.items
                    .iter()
                    .position(|i| i.item_id == item_id)
                    .map(|ii| (vi, ii))
            })
            .ok_or_else(|| CoreError::item_not_in_cart(vendor_id, item_id))
    }

    /// Removes the item and cascades to the vendor cart when it empties.
    fn remove_at(&mut self, vi: usize, ii: usize) -> ItemChange {
        let vendor = &mut self.vendors[vi];
        let removed = vendor.items.remove(ii);
        let change = ItemChange::new(&vendor.vendor_id, &removed.item_id, ChangeKind::Removed, 0);

        if vendor.items.is_empty() {
            self.vendors.remove(vi);
        }

        change
    }

    /// Checks the invariants a freshly decoded snapshot must satisfy.
    fn check_invariants(&mut self) -> Result<(), String> {
        if self.vendors.len() > 1 {
            return Err(format!(
                "cart holds {} vendors, at most one is allowed",
                self.vendors.len()
            ));
        }

        for vendor in &mut self.vendors {
            validation::validate_id("vendor id", &vendor.vendor_id).map_err(|e| e.to_string())?;
            if vendor.items.is_empty() {
                return Err(format!("vendor {} has no items", vendor.vendor_id));
            }
            if vendor.items.len() > MAX_CART_ITEMS {
                return Err(format!("vendor {} has too many items", vendor.vendor_id));
            }
            if vendor.vendor_name.trim().is_empty() {
                vendor.vendor_name = Vendor::unnamed(vendor.vendor_id.clone()).display_name();
            }

            for item in &vendor.items {
                validation::validate_id("item id", &item.item_id).map_err(|e| e.to_string())?;
                validation::validate_price(item.price).map_err(|e| e.to_string())?;
                validate_quantity(i64::from(item.quantity))
                    .map_err(|e| format!("item {}: {}", item.item_id, e))?;
            }
        }

        Ok(())
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        keyed::serialize(&self.vendors, serializer)
    }
}

/// Decoding is strict: any invariant violation is a decode error, which the
/// store turns into an empty cart.
impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut cart = Cart {
            vendors: keyed::deserialize(deserializer)?,
        };
        cart.check_invariants().map_err(serde::de::Error::custom)?;
        Ok(cart)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
