//! # Cart Commands
//!
//! Cart manipulation from the command line.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐  add   ┌──────────┐  checkout  ┌──────────────┐           │
//! │  │  Empty   │───────►│ One      │───────────►│ Order placed │           │
//! │  │  Cart    │        │ Vendor   │            │ (cart empty) │           │
//! │  └──────────┘        └──────────┘            └──────────────┘           │
//! │       ▲                 │    │                                          │
//! │       │            dec/set/remove                                       │
//! │       │                 │    │ add from another vendor                  │
//! │       │                 │    ▼                                          │
//! │       │                 │  conflict ──(--replace)──► new vendor cart    │
//! │       │                 ▼                                               │
//! │       └──────── last item removed / clear                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use munch_core::projector::{quantities_for, VendorView};
use munch_core::{Cart, CartTotals, CartView, ItemChange, MenuItem, Money, Vendor, VendorConflict};
use munch_store::{AddResult, CartMutator, CartStore, CartUpdate};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;

/// Cart response including vendor sections, totals, and what changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub vendors: Vec<VendorView>,
    pub totals: CartTotals,
    pub changes: Vec<ItemChange>,
    /// Set when an add was refused because the cart holds another vendor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<VendorConflict>,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        let view = CartView::from(cart);
        CartResponse {
            vendors: view.vendors,
            totals: view.totals,
            changes: Vec::new(),
            conflict: None,
        }
    }
}

impl From<CartUpdate> for CartResponse {
    fn from(update: CartUpdate) -> Self {
        CartResponse {
            changes: update.changes,
            ..CartResponse::from(&update.cart)
        }
    }
}

/// Menu item as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemArgs {
    pub vendor_id: String,
    pub vendor_name: Option<String>,
    pub item_id: String,
    pub name: String,
    pub price: f64,
    pub veg: bool,
}

impl ItemArgs {
    fn into_parts(self) -> Result<(Vendor, MenuItem), ApiError> {
        let price = Money::from_decimal(self.price)
            .ok_or_else(|| ApiError::validation(format!("Invalid price: {}", self.price)))?;

        let vendor = Vendor {
            id: self.vendor_id,
            name: self.vendor_name,
        };
        let mut item = MenuItem::new(self.item_id, self.name, price);
        item.is_vegetarian = self.veg;

        Ok((vendor, item))
    }
}

/// Gets the current cart contents.
pub fn get_cart<S: CartStore>(mutator: &CartMutator<S>) -> CartResponse {
    debug!("get_cart command");
    CartResponse::from(&mutator.cart())
}

/// Adds one unit of a menu item.
///
/// ## Behavior
/// - Item already in cart: quantity increases by one
/// - Cart empty or same vendor: item added at quantity 1
/// - Cart holds another vendor: nothing is written and the response carries
///   the conflict, unless `replace` is set, in which case the cart is
///   replaced by the new item
pub fn add_to_cart<S: CartStore>(
    mutator: &CartMutator<S>,
    args: ItemArgs,
    replace: bool,
) -> Result<CartResponse, ApiError> {
    debug!(vendor_id = %args.vendor_id, item_id = %args.item_id, replace, "add_to_cart command");
    let (vendor, item) = args.into_parts()?;

    match mutator.add_item(&vendor, &item)? {
        AddResult::Added(update) => Ok(update.into()),
        AddResult::Conflict(_) if replace => {
            Ok(mutator.resolve_conflict(true, &vendor, &item)?.into())
        }
        AddResult::Conflict(conflict) => {
            let mut response = CartResponse::from(&mutator.cart());
            response.conflict = Some(conflict);
            Ok(response)
        }
    }
}

/// Decreases an item's quantity by one, removing it at zero.
pub fn decrement_cart_item<S: CartStore>(
    mutator: &CartMutator<S>,
    vendor_id: &str,
    item_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(vendor_id, item_id, "decrement_cart_item command");
    Ok(mutator.decrement_item(vendor_id, item_id)?.into())
}

/// Sets an item's quantity. Values below 1 are rejected.
pub fn update_cart_item<S: CartStore>(
    mutator: &CartMutator<S>,
    vendor_id: &str,
    item_id: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(vendor_id, item_id, quantity, "update_cart_item command");
    Ok(mutator.set_quantity(vendor_id, item_id, quantity)?.into())
}

/// Removes an item regardless of quantity.
pub fn remove_from_cart<S: CartStore>(
    mutator: &CartMutator<S>,
    vendor_id: &str,
    item_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(vendor_id, item_id, "remove_from_cart command");
    Ok(mutator.remove_item(vendor_id, item_id)?.into())
}

/// Empties the cart.
pub fn clear_cart<S: CartStore>(mutator: &CartMutator<S>) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");
    Ok(mutator.clear()?.into())
}

/// Quantities the menu page shows next to each of a vendor's items.
///
/// Sorted by item id so the output is stable.
pub fn menu_quantities<S: CartStore>(
    mutator: &CartMutator<S>,
    vendor_id: &str,
) -> BTreeMap<String, u32> {
    debug!(vendor_id, "menu_quantities command");
    quantities_for(&mutator.cart(), vendor_id).into_iter().collect()
}
