//! # CLI Commands Module
//!
//! Every subcommand the `munch` binary exposes.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── cart.rs      ◄─── show, add, dec, set, remove, clear, quantities
//! └── checkout.rs  ◄─── checkout
//! ```
//!
//! Commands are plain functions over a `CartMutator` or a
//! `CheckoutCoordinator`, so tests drive them with in-memory stores.
//! Each returns a serializable response or an [`ApiError`](crate::error::ApiError).

pub mod cart;
pub mod checkout;

pub use cart::{CartResponse, ItemArgs};
pub use checkout::CheckoutResponse;
