//! # Checkout Coordinator
//!
//! Drives one order submission at a time.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────┐  submit()   ┌────────────┐   2xx    ┌───────────┐             │
//! │  │ Idle │ ──────────► │ Submitting │ ───────► │ Succeeded │             │
//! │  └──────┘             └────────────┘          └───────────┘             │
//! │     ▲                   │        ▲                 │                    │
//! │     │   error / dropped │        │ submit()        │                    │
//! │     │                   ▼        │ (retry or       │                    │
//! │     │              ┌────────┐    │  next order)    │                    │
//! │     ├── reset() ── │ Failed │ ───┘                 │                    │
//! │     │              └────────┘                      │                    │
//! │     └─────────────────── reset() ──────────────────┘                    │
//! │                                                                         │
//! │ submit() from Failed or Succeeded goes straight to Submitting           │
//! │ submit() while Submitting → AlreadyInProgress, state untouched          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Side Effects
//! - Success clears the stored cart; failure leaves it byte-for-byte as it was
//! - Nothing is ever retried automatically
//!
//! The state lives in a `std::sync::Mutex` that is only held for the
//! read-modify-write of the state itself, never across the network await.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use munch_core::projector::grand_total;
use munch_core::{Cart, Money, ValidationError};
use munch_store::CartStore;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::api::OrderApi;
use crate::config::CheckoutSettings;
use crate::credential::Credential;
use crate::error::{CheckoutError, CheckoutResult};
use crate::payload::OrderRequest;

/// Message recorded when a submission is abandoned mid-flight.
pub const INTERRUPTED_MESSAGE: &str = "checkout was interrupted";

// =============================================================================
// Checkout State
// =============================================================================

/// Where the checkout button currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "camelCase")]
#[ts(export)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        redirect: String,
    },
    Failed {
        message: String,
    },
}

impl CheckoutState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, CheckoutState::Submitting)
    }
}

/// Proof of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// Where to send the patron next.
    pub redirect: String,
    /// Id sent as `X-Request-Id`.
    pub request_id: Uuid,
    pub placed_at: DateTime<Utc>,
    /// Grand total of the cart that was submitted.
    pub total: Money,
}

// =============================================================================
// Coordinator
// =============================================================================

/// Submits the cart and clears it once the order is placed.
///
/// ## Usage
/// ```rust,ignore
/// let coordinator = CheckoutCoordinator::new(store, HttpOrderApi::new(&config)?)
///     .with_settings(config.checkout.clone());
///
/// match coordinator.submit(&cart, credentials.credential().as_ref()).await {
///     Ok(receipt) => navigate(&receipt.redirect),
///     Err(e) => toast(e.to_string()),
/// }
/// ```
#[derive(Debug)]
pub struct CheckoutCoordinator<S, A> {
    store: S,
    api: A,
    settings: CheckoutSettings,
    state: Mutex<CheckoutState>,
}

impl<S: CartStore, A: OrderApi> CheckoutCoordinator<S, A> {
    /// Creates an idle coordinator with default settings.
    pub fn new(store: S, api: A) -> Self {
        CheckoutCoordinator {
            store,
            api,
            settings: CheckoutSettings::default(),
            state: Mutex::new(CheckoutState::Idle),
        }
    }

    /// Replaces the checkout settings.
    pub fn with_settings(mut self, settings: CheckoutSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Current state snapshot.
    pub fn state(&self) -> CheckoutState {
        self.lock_state().clone()
    }

    /// Returns a finished coordinator to `Idle`. Ignored while submitting.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        if !state.is_submitting() {
            *state = CheckoutState::Idle;
        }
    }

    /// Submits the currently stored cart.
    pub async fn checkout(&self, credential: Option<&Credential>) -> CheckoutResult<CheckoutReceipt> {
        let cart = self.store.load();
        self.submit(&cart, credential).await
    }

    /// Places an order for `cart`.
    ///
    /// ## Steps
    /// 1. Reject an empty cart, a non-positive total, or a missing/blank credential
    /// 2. Reject if another submission is in flight
    /// 3. POST the order
    /// 4. On success clear the store; on failure leave it untouched
    pub async fn submit(
        &self,
        cart: &Cart,
        credential: Option<&Credential>,
    ) -> CheckoutResult<CheckoutReceipt> {
        let credential = validate_submission(cart, credential)?;
        let in_flight = self.begin()?;

        let request_id = Uuid::new_v4();
        let total = grand_total(cart);
        let order = OrderRequest::from(cart);
        info!(%request_id, %total, vendors = order.orders.len(), "Placing order");

        match self.api.place_order(&order, credential, request_id).await {
            Ok(accepted) => {
                if let Err(e) = self.store.clear() {
                    error!(%request_id, error = %e, "Order placed but the cart could not be cleared");
                }

                let redirect = accepted
                    .redirect
                    .unwrap_or_else(|| self.settings.success_redirect.clone());
                in_flight.finish(CheckoutState::Succeeded {
                    redirect: redirect.clone(),
                });
                info!(%request_id, %redirect, "Order placed");

                Ok(CheckoutReceipt {
                    redirect,
                    request_id,
                    placed_at: Utc::now(),
                    total,
                })
            }
            Err(e) => {
                warn!(%request_id, error = %e, retryable = e.is_retryable(), "Order failed");
                in_flight.finish(CheckoutState::Failed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn begin(&self) -> CheckoutResult<InFlight<'_>> {
        let mut state = self.lock_state();
        if state.is_submitting() {
            return Err(CheckoutError::AlreadyInProgress);
        }
        *state = CheckoutState::Submitting;
        Ok(InFlight {
            state: &self.state,
            finished: false,
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_submission<'a>(
    cart: &Cart,
    credential: Option<&'a Credential>,
) -> Result<&'a Credential, ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    if grand_total(cart) <= Money::zero() {
        return Err(ValidationError::ZeroTotal);
    }
    credential
        .filter(|c| !c.is_blank())
        .ok_or(ValidationError::MissingCredential)
}

/// Holds the `Submitting` state; a dropped submission lands in `Failed`.
struct InFlight<'a> {
    state: &'a Mutex<CheckoutState>,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(mut self, next: CheckoutState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_submitting() {
            warn!("Checkout dropped while waiting for the server");
            *state = CheckoutState::Failed {
                message: INTERRUPTED_MESSAGE.to_string(),
            };
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OrderAccepted;
    use async_trait::async_trait;
    use munch_core::{MenuItem, Vendor, MAX_CART_ITEMS, MAX_ITEM_PRICE, MAX_ITEM_QUANTITY};
    use munch_store::{JsonCartStore, MemoryBackend, StoreError, StoreResult, CART_KEY};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Accept(Option<&'static str>),
        Reject(CheckoutError),
        Hang,
    }

    /// Scripted order API; replies are consumed in order.
    #[derive(Default)]
    struct FakeApi {
        replies: Mutex<VecDeque<Reply>>,
        calls: AtomicUsize,
        orders: Mutex<Vec<OrderRequest>>,
    }

    impl FakeApi {
        fn replying(replies: impl IntoIterator<Item = Reply>) -> Self {
            FakeApi {
                replies: Mutex::new(replies.into_iter().collect()),
                ..FakeApi::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OrderApi for FakeApi {
        async fn place_order(
            &self,
            order: &OrderRequest,
            _credential: &Credential,
            _request_id: Uuid,
        ) -> CheckoutResult<OrderAccepted> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.orders.lock().unwrap().push(order.clone());
            let reply = self.replies.lock().unwrap().pop_front();

            tokio::task::yield_now().await;

            match reply {
                Some(Reply::Accept(redirect)) => Ok(OrderAccepted {
                    redirect: redirect.map(str::to_string),
                }),
                Some(Reply::Reject(e)) => Err(e),
                Some(Reply::Hang) => std::future::pending().await,
                None => Err(CheckoutError::Network("no scripted reply".into())),
            }
        }
    }

    fn stored_cart(backend: &MemoryBackend) -> (JsonCartStore<MemoryBackend>, Cart) {
        let store = JsonCartStore::new(backend.clone());
        let mut cart = Cart::new();
        let vendor = Vendor::new("v1", "Dosa Corner");
        cart.add_item(&vendor, &MenuItem::new("i1", "Masala Dosa", Money::from_major(100)))
            .unwrap();
        cart.add_item(&vendor, &MenuItem::new("i1", "Masala Dosa", Money::from_major(100)))
            .unwrap();
        store.save(&cart).unwrap();
        (store, cart)
    }

    fn token() -> Credential {
        Credential::new("tok")
    }

    #[tokio::test]
    async fn test_success_clears_store() {
        let backend = MemoryBackend::new();
        let (store, cart) = stored_cart(&backend);
        let coordinator = CheckoutCoordinator::new(store, FakeApi::replying([Reply::Accept(None)]));

        let receipt = coordinator.submit(&cart, Some(&token())).await.unwrap();

        assert_eq!(receipt.redirect, "/Foodcart/orders");
        assert_eq!(receipt.total, Money::from_major(200));
        assert_eq!(backend.raw(CART_KEY), None);
        assert_eq!(
            coordinator.state(),
            CheckoutState::Succeeded {
                redirect: "/Foodcart/orders".into()
            }
        );
        assert_eq!(coordinator.api.orders.lock().unwrap()[0].orders[0].items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_server_redirect_wins() {
        let backend = MemoryBackend::new();
        let (store, _) = stored_cart(&backend);
        let coordinator = CheckoutCoordinator::new(
            store,
            FakeApi::replying([Reply::Accept(Some("/Foodcart/orders/42"))]),
        );

        let receipt = coordinator.checkout(Some(&token())).await.unwrap();
        assert_eq!(receipt.redirect, "/Foodcart/orders/42");
    }

    #[tokio::test]
    async fn test_failure_leaves_cart_identical_and_allows_retry() {
        let backend = MemoryBackend::new();
        let (store, cart) = stored_cart(&backend);
        let before = backend.raw(CART_KEY);
        let coordinator = CheckoutCoordinator::new(
            store,
            FakeApi::replying([
                Reply::Reject(CheckoutError::Server {
                    status: 503,
                    message: "Kitchen is closed".into(),
                }),
                Reply::Accept(None),
            ]),
        );

        let err = coordinator.submit(&cart, Some(&token())).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(backend.raw(CART_KEY), before);
        assert_eq!(
            coordinator.state(),
            CheckoutState::Failed {
                message: "Kitchen is closed".into()
            }
        );

        coordinator.submit(&cart, Some(&token())).await.unwrap();
        assert_eq!(coordinator.api.calls(), 2);
        assert_eq!(backend.raw(CART_KEY), None);
    }

    #[tokio::test]
    async fn test_preconditions_are_checked_before_any_request() {
        let backend = MemoryBackend::new();
        let (store, cart) = stored_cart(&backend);
        let coordinator = CheckoutCoordinator::new(store, FakeApi::default());

        let empty = Cart::new();
        assert_eq!(
            coordinator.submit(&empty, Some(&token())).await.unwrap_err(),
            CheckoutError::Validation(ValidationError::EmptyCart)
        );

        let mut free = Cart::new();
        free.add_item(&Vendor::unnamed("v9"), &MenuItem::new("w", "Water", Money::zero()))
            .unwrap();
        assert_eq!(
            coordinator.submit(&free, Some(&token())).await.unwrap_err(),
            CheckoutError::Validation(ValidationError::ZeroTotal)
        );

        for credential in [None, Some(Credential::new("  "))] {
            assert_eq!(
                coordinator.submit(&cart, credential.as_ref()).await.unwrap_err(),
                CheckoutError::Validation(ValidationError::MissingCredential)
            );
        }

        assert_eq!(coordinator.api.calls(), 0);
        assert_eq!(coordinator.state(), CheckoutState::Idle);
    }

    #[tokio::test]
    async fn test_second_submission_is_rejected_while_in_flight() {
        let backend = MemoryBackend::new();
        let (store, cart) = stored_cart(&backend);
        let coordinator = CheckoutCoordinator::new(
            store,
            FakeApi::replying([Reply::Accept(None), Reply::Accept(None)]),
        );
        let credential = token();

        let (first, second) = tokio::join!(
            coordinator.submit(&cart, Some(&credential)),
            coordinator.submit(&cart, Some(&credential)),
        );

        let (placed, rejected) = if first.is_ok() { (first, second) } else { (second, first) };
        assert!(placed.is_ok());
        assert_eq!(rejected.unwrap_err(), CheckoutError::AlreadyInProgress);
        assert_eq!(coordinator.api.calls(), 1);
        assert!(matches!(coordinator.state(), CheckoutState::Succeeded { .. }));
    }

    #[tokio::test]
    async fn test_dropped_submission_does_not_wedge() {
        let backend = MemoryBackend::new();
        let (store, cart) = stored_cart(&backend);
        let before = backend.raw(CART_KEY);
        let coordinator =
            CheckoutCoordinator::new(store, FakeApi::replying([Reply::Hang, Reply::Accept(None)]));
        let credential = token();

        tokio::select! {
            biased;
            _ = coordinator.submit(&cart, Some(&credential)) => panic!("hanging submission finished"),
            _ = tokio::task::yield_now() => {}
        }

        assert_eq!(
            coordinator.state(),
            CheckoutState::Failed {
                message: INTERRUPTED_MESSAGE.into()
            }
        );
        assert_eq!(backend.raw(CART_KEY), before);
        assert!(coordinator.submit(&cart, Some(&credential)).await.is_ok());
    }

    /// Store whose clear always fails.
    struct StickyStore(JsonCartStore<MemoryBackend>);

    impl CartStore for StickyStore {
        fn load(&self) -> Cart {
            self.0.load()
        }

        fn save(&self, cart: &Cart) -> StoreResult<()> {
            self.0.save(cart)
        }

        fn clear(&self) -> StoreResult<()> {
            Err(StoreError::io(
                CART_KEY,
                std::io::Error::new(std::io::ErrorKind::Other, "disk unplugged"),
            ))
        }
    }

    #[tokio::test]
    async fn test_clear_failure_still_counts_as_placed() {
        let backend = MemoryBackend::new();
        let (store, cart) = stored_cart(&backend);
        let coordinator =
            CheckoutCoordinator::new(StickyStore(store), FakeApi::replying([Reply::Accept(None)]));

        assert!(coordinator.submit(&cart, Some(&token())).await.is_ok());
        assert!(matches!(coordinator.state(), CheckoutState::Succeeded { .. }));
    }

    #[tokio::test]
    async fn test_submit_after_success_places_next_order() {
        let backend = MemoryBackend::new();
        let (store, cart) = stored_cart(&backend);
        let coordinator = CheckoutCoordinator::new(
            store,
            FakeApi::replying([Reply::Accept(None), Reply::Accept(Some("/orders/2"))]),
        );

        coordinator.submit(&cart, Some(&token())).await.unwrap();
        assert!(matches!(coordinator.state(), CheckoutState::Succeeded { .. }));

        let receipt = coordinator.submit(&cart, Some(&token())).await.unwrap();
        assert_eq!(receipt.redirect, "/orders/2");
        assert_eq!(coordinator.api.calls(), 2);
    }

    #[tokio::test]
    async fn test_largest_cart_total_is_exact() {
        let backend = MemoryBackend::new();
        let store = JsonCartStore::new(backend.clone());
        let mut cart = Cart::new();
        let vendor = Vendor::new("v1", "Dosa Corner");
        for n in 0..MAX_CART_ITEMS {
            let item = MenuItem::new(format!("i{}", n), "Gold Thali", MAX_ITEM_PRICE);
            cart.add_item(&vendor, &item).unwrap();
            cart.set_quantity("v1", &item.id, i64::from(MAX_ITEM_QUANTITY))
                .unwrap();
        }
        let coordinator =
            CheckoutCoordinator::new(store, FakeApi::replying([Reply::Accept(None)]));

        let receipt = coordinator.submit(&cart, Some(&token())).await.unwrap();
        assert_eq!(
            receipt.total.minor(),
            MAX_ITEM_PRICE.minor() * i64::from(MAX_ITEM_QUANTITY) * MAX_CART_ITEMS as i64
        );
    }

    #[tokio::test]
    async fn test_reset() {
        let backend = MemoryBackend::new();
        let (store, cart) = stored_cart(&backend);
        let coordinator = CheckoutCoordinator::new(
            store,
            FakeApi::replying([Reply::Reject(CheckoutError::Unauthorized(
                "Session expired".into(),
            ))]),
        );

        let err = coordinator.submit(&cart, Some(&token())).await.unwrap_err();
        assert_eq!(err.to_string(), "Session expired");

        coordinator.reset();
        assert_eq!(coordinator.state(), CheckoutState::Idle);
    }
}
