//! # munch-checkout: Order Submission for Mall Munch
//!
//! Turns the stored cart into a placed order, exactly once per click.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Flow                                    │
//! │                                                                         │
//! │  "Place order" click                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  CheckoutCoordinator (coordinator.rs)                           │   │
//! │  │    validate → Submitting → OrderApi.place_order → clear cart    │   │
//! │  └───────────────┬───────────────────────────────┬─────────────────┘   │
//! │                  │                               │                      │
//! │                  ▼                               ▼                      │
//! │  ┌───────────────────────────────┐  ┌──────────────────────────────┐   │
//! │  │  HttpOrderApi (api.rs)        │  │  CartStore (munch-store)     │   │
//! │  │  POST /mall/placeOrder        │  │  cleared only on success     │   │
//! │  │  Bearer + X-Request-Id        │  │                              │   │
//! │  └───────────────────────────────┘  └──────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`coordinator`] - Submission state machine
//! - [`api`] - The `OrderApi` seam and its HTTP client
//! - [`payload`] - Wire types for the order endpoint
//! - [`credential`] - Patron credentials
//! - [`config`] - Client configuration (TOML + environment)
//! - [`error`] - Checkout error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod coordinator;
pub mod credential;
pub mod error;
pub mod payload;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{HttpOrderApi, OrderAccepted, OrderApi};
pub use config::{ApiSettings, CheckoutSettings, ClientConfig, StorageSettings};
pub use coordinator::{CheckoutCoordinator, CheckoutReceipt, CheckoutState};
pub use credential::{Credential, CredentialSource, EnvCredential, StaticCredential};
pub use error::{CheckoutError, CheckoutResult};
pub use payload::{OrderLine, OrderRequest, VendorOrder};
