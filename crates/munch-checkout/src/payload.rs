//! # Order Payload
//!
//! Wire types for `POST /mall/placeOrder`.
//!
//! ```text
//! Cart                                    OrderRequest
//! ────                                    ────────────
//! v1 ─┬─ i1 Masala Dosa ₹100 × 2    ──►   {"orders":[{"foodCartId":"v1","items":[
//!     └─ i2 Filter Coffee ₹30 × 1           {"itemId":"i1","name":"Masala Dosa","price":100,"veg":true,"quantity":2},
//!                                           {"itemId":"i2","name":"Filter Coffee","price":30,"veg":true,"quantity":1}]}]}
//! ```
//!
//! Vendor and item order follow the cart's insertion order.

use munch_core::{Cart, LineItem, Money, VendorCart};
use serde::{Deserialize, Serialize};

/// Request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub orders: Vec<VendorOrder>,
}

/// One vendor's part of the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorOrder {
    #[serde(rename = "foodCartId")]
    pub vendor_id: String,
    pub items: Vec<OrderLine>,
}

/// One line of a vendor order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "itemId")]
    pub item_id: String,
    pub name: String,
    pub price: Money,
    pub veg: bool,
    pub quantity: u32,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        OrderLine {
            item_id: item.item_id.clone(),
            name: item.name.clone(),
            price: item.price,
            veg: item.is_vegetarian,
            quantity: item.quantity,
        }
    }
}

impl From<&VendorCart> for VendorOrder {
    fn from(vendor: &VendorCart) -> Self {
        VendorOrder {
            vendor_id: vendor.vendor_id.clone(),
            items: vendor.items.iter().map(OrderLine::from).collect(),
        }
    }
}

impl From<&Cart> for OrderRequest {
    fn from(cart: &Cart) -> Self {
        OrderRequest {
            orders: cart.vendors().iter().map(VendorOrder::from).collect(),
        }
    }
}

/// 2xx response body. Everything except `redirect` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OrderResponse {
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Non-2xx response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}
