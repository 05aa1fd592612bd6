//! # Checkout Command
//!
//! Places the stored cart as an order.
//!
//! ```text
//! munch checkout
//!      │
//!      ├── empty cart / zero total / no token ──► VALIDATION_ERROR (no request)
//!      ├── server 401 ──────────────────────────► UNAUTHORIZED (cart kept)
//!      ├── server 4xx/5xx ──────────────────────► SERVER_ERROR (cart kept)
//!      └── accepted ────────────────────────────► { receipt, state } (cart cleared)
//! ```

use munch_checkout::{CheckoutCoordinator, CheckoutReceipt, CheckoutState, Credential, OrderApi};
use munch_store::CartStore;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;

/// Output of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub receipt: CheckoutReceipt,
    pub state: CheckoutState,
}

/// Submits the stored cart.
pub async fn place_order<S: CartStore, A: OrderApi>(
    coordinator: &CheckoutCoordinator<S, A>,
    credential: Option<&Credential>,
) -> Result<CheckoutResponse, ApiError> {
    debug!(has_credential = credential.is_some(), "place_order command");

    let receipt = coordinator.checkout(credential).await?;
    Ok(CheckoutResponse {
        receipt,
        state: coordinator.state(),
    })
}
