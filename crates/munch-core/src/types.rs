//! # Domain Types
//!
//! Menu inputs and the line items they become once added to a cart.
//!
//! ## Type Flow
//! ```text
//! ┌─────────────────┐     add_item      ┌─────────────────┐
//! │    MenuItem     │ ────────────────► │    LineItem     │
//! │  ─────────────  │  (frozen copy,    │  ─────────────  │
//! │  id             │   quantity = 1)   │  item_id        │
//! │  name, price    │                   │  name, price    │
//! │  is_vegetarian  │                   │  is_vegetarian  │
//! │  description?   │                   │  quantity ≥ 1   │
//! │  rating?        │                   │  description?   │
//! └─────────────────┘                   │  rating?        │
//!                                       └─────────────────┘
//! ```
//!
//! ## Persisted Field Names
//! Line items are stored with camelCase keys. Blobs written by the original
//! browser client used `id`, `veg` and `IRating`; those are accepted as
//! aliases on read.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::keyed::Keyed;
use crate::money::Money;

// =============================================================================
// Vendor
// =============================================================================

/// The food cart a patron is ordering from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    /// Vendor identifier.
    pub id: String,

    /// Display name; may be missing when the menu endpoint omits it.
    #[serde(default)]
    pub name: Option<String>,
}

impl Vendor {
    /// Creates a vendor with a display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Vendor {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    /// Creates a vendor whose name is not known.
    pub fn unnamed(id: impl Into<String>) -> Self {
        Vendor {
            id: id.into(),
            name: None,
        }
    }

    /// Returns the name to show and persist, falling back to `Food Cart <id>`.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Food Cart {}", self.id),
        }
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// An item on a vendor's menu, as the menu view receives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Item identifier, unique within the vendor's menu.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Vegetarian marker shown next to the item.
    #[serde(default, alias = "veg")]
    pub is_vegetarian: bool,

    /// Optional menu description.
    #[serde(default)]
    pub description: Option<String>,

    /// Optional average rating (0-5).
    #[serde(default)]
    pub rating: Option<f64>,
}

impl MenuItem {
    /// Creates a non-vegetarian menu item with no description or rating.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        MenuItem {
            id: id.into(),
            name: name.into(),
            price,
            is_vegetarian: false,
            description: None,
            rating: None,
        }
    }

    /// Marks the item as vegetarian.
    pub fn vegetarian(mut self) -> Self {
        self.is_vegetarian = true;
        self
    }

    /// Sets the menu description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One menu item plus its quantity within a vendor's cart.
///
/// ## Price Freezing
/// Name, price and flags are copied from the [`MenuItem`] when the item is
/// first added. Later menu changes do not alter what is already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Menu item identifier.
    #[serde(alias = "id")]
    pub item_id: String,

    /// Name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    #[ts(type = "number")]
    pub price: Money,

    /// Vegetarian marker.
    #[serde(default, alias = "veg")]
    pub is_vegetarian: bool,

    /// Quantity in cart, always at least 1.
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "IRating")]
    #[ts(optional)]
    pub rating: Option<f64>,
}

impl LineItem {
    /// Creates a line item at quantity 1 from a menu item.
    pub fn from_menu_item(item: &MenuItem) -> Self {
        LineItem {
            item_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            is_vegetarian: item.is_vegetarian,
            quantity: 1,
            description: item.description.clone(),
            rating: item.rating,
        }
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

impl Keyed for LineItem {
    fn key(&self) -> &str {
        &self.item_id
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
