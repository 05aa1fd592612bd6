//! # munch-store: Cart Persistence for Mall Munch
//!
//! This crate keeps the cart snapshot in a key-value store and applies every
//! mutation as load → pure transition → save.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mall Munch Data Flow                             │
//! │                                                                         │
//! │  UI action ("+" on Masala Dosa)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    munch-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  CartMutator  │    │   CartStore   │    │   Backends   │  │   │
//! │  │   │ (mutator.rs)  │    │  (store.rs)   │    │ (backend/)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ add_item      │───►│ load / save   │───►│ MemoryBackend│  │   │
//! │  │   │ decrement ... │    │ clear         │    │ FileBackend  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  key "cart" → {"v1":{"vendorId":"v1",...,"items":{...}}}         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `CartStore` contract and its JSON implementation
//! - [`backend`] - Raw key-value backends (memory, file)
//! - [`mutator`] - Persisted cart mutations
//! - [`error`] - Store and mutation error types
//!
//! ## Usage
//!
//! ```rust
//! use munch_core::{MenuItem, Money, Vendor};
//! use munch_store::{AddResult, CartMutator, CartStore, JsonCartStore, MemoryBackend};
//!
//! let store = JsonCartStore::new(MemoryBackend::new());
//! let mutator = CartMutator::new(store.clone());
//!
//! let vendor = Vendor::new("v1", "Dosa Corner");
//! let dosa = MenuItem::new("i1", "Masala Dosa", Money::from_major(100));
//! assert!(matches!(mutator.add_item(&vendor, &dosa).unwrap(), AddResult::Added(_)));
//!
//! assert_eq!(store.load().item("v1", "i1").unwrap().quantity, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod error;
pub mod mutator;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::{MutateError, MutateResult, StoreError, StoreResult};
pub use mutator::{AddResult, CartMutator, CartUpdate};
pub use store::{CartStore, JsonCartStore, CART_KEY};
