//! # Projector Module
//!
//! Read-only views derived from a [`Cart`]. Nothing here mutates or caches:
//! every projection is recomputed from the snapshot it is handed, so the
//! cart page and the menu page always agree.
//!
//! ## Projections
//! ```text
//!   Cart ──┬──► quantities_for(vendor)  item id → quantity (menu badges)
//!          ├──► vendor_total(vendor)    Σ price × quantity
//!          ├──► grand_total(cart)       Σ vendor totals
//!          ├──► totals(cart)            CartTotals (header summary)
//!          └──► CartView::from(cart)    per-vendor lines + totals (cart page)
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, VendorCart};
use crate::money::Money;
use crate::types::LineItem;

// =============================================================================
// Scalar Projections
// =============================================================================

/// Unit price × quantity.
#[inline]
pub fn line_total(item: &LineItem) -> Money {
    item.line_total()
}

/// Sum of line totals for one vendor.
pub fn vendor_total(vendor: &VendorCart) -> Money {
    vendor.items.iter().map(LineItem::line_total).sum()
}

/// Sum of every vendor total. Zero for an empty cart.
pub fn grand_total(cart: &Cart) -> Money {
    cart.vendors().iter().map(vendor_total).sum()
}

/// Quantities of a vendor's items, for the "− n +" controls on the menu.
///
/// Empty when the cart does not hold that vendor.
pub fn quantities_for(cart: &Cart, vendor_id: &str) -> HashMap<String, u32> {
    cart.vendor(vendor_id)
        .map(|vendor| {
            vendor
                .items
                .iter()
                .map(|item| (item.item_id.clone(), item.quantity))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Summary Types
// =============================================================================

/// Header summary of the whole cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Distinct line items.
    pub item_count: usize,
    /// Sum of quantities.
    pub total_quantity: u32,
    #[ts(type = "number")]
    pub grand_total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let items = cart.vendors().iter().flat_map(|v| v.items.iter());
        let (item_count, total_quantity) =
            items.fold((0usize, 0u32), |(count, qty), item| (count + 1, qty + item.quantity));

        CartTotals {
            item_count,
            total_quantity,
            grand_total: grand_total(cart),
        }
    }
}

/// Convenience wrapper around `CartTotals::from`.
pub fn totals(cart: &Cart) -> CartTotals {
    CartTotals::from(cart)
}

/// Per-vendor subtotal row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VendorTotals {
    pub vendor_id: String,
    pub vendor_name: String,
    pub item_count: usize,
    #[ts(type = "number")]
    pub total: Money,
}

impl From<&VendorCart> for VendorTotals {
    fn from(vendor: &VendorCart) -> Self {
        VendorTotals {
            vendor_id: vendor.vendor_id.clone(),
            vendor_name: vendor.vendor_name.clone(),
            item_count: vendor.items.len(),
            total: vendor_total(vendor),
        }
    }
}

// =============================================================================
// Cart View
// =============================================================================

/// A vendor section as rendered on the cart page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorView {
    #[serde(flatten)]
    pub summary: VendorTotals,
    pub lines: Vec<LineView>,
}

/// A single row on the cart page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    #[serde(flatten)]
    pub item: LineItem,
    pub line_total: Money,
}

/// Everything the cart page needs, in cart order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub vendors: Vec<VendorView>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let vendors = cart
            .vendors()
            .iter()
            .map(|vendor| VendorView {
                summary: VendorTotals::from(vendor),
                lines: vendor
                    .items
                    .iter()
                    .map(|item| LineView {
                        item: item.clone(),
                        line_total: item.line_total(),
                    })
                    .collect(),
            })
            .collect();

        CartView {
            vendors,
            totals: CartTotals::from(cart),
        }
    }
}

impl CartView {
    /// True when there is nothing to show; the page renders its empty state.
    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MenuItem, Vendor};

    fn sample_cart() -> Cart {
        let vendor = Vendor::new("v1", "Dosa Corner");
        let dosa = MenuItem::new("i1", "Masala Dosa", Money::from_major(100));
        let coffee = MenuItem::new("i2", "Filter Coffee", Money::from_major_minor(30, 50));

        let mut cart = Cart::new();
        cart.add_item(&vendor, &dosa).unwrap();
        cart.add_item(&vendor, &dosa).unwrap();
        cart.add_item(&vendor, &coffee).unwrap();
        cart
    }

    #[test]
    fn test_empty_cart_projections() {
        let cart = Cart::new();
        assert_eq!(grand_total(&cart), Money::zero());
        assert!(quantities_for(&cart, "v1").is_empty());
        assert_eq!(totals(&cart), CartTotals::default());
        assert!(CartView::from(&cart).is_empty());
    }

    #[test]
    fn test_totals() {
        let cart = sample_cart();
        let totals = totals(&cart);

        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.grand_total, Money::from_major_minor(230, 50));
        assert_eq!(grand_total(&cart), vendor_total(cart.active_vendor().unwrap()));
    }

    #[test]
    fn test_quantities_for() {
        let cart = sample_cart();
        let quantities = quantities_for(&cart, "v1");

        assert_eq!(quantities.get("i1"), Some(&2));
        assert_eq!(quantities.get("i2"), Some(&1));
        assert!(quantities_for(&cart, "v2").is_empty());
    }

    #[test]
    fn test_cart_view_serializes_flat_rows() {
        let view = CartView::from(&sample_cart());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["vendors"][0]["vendorName"], "Dosa Corner");
        assert_eq!(json["vendors"][0]["total"], 230.5);
        assert_eq!(json["vendors"][0]["lines"][0]["itemId"], "i1");
        assert_eq!(json["vendors"][0]["lines"][0]["lineTotal"], 200);
        assert_eq!(json["totals"]["grandTotal"], 230.5);
    }
}
