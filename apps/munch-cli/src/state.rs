//! # Application State
//!
//! What a single `munch` invocation needs: the loaded configuration and the
//! file-backed cart store.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  AppState                                                        │
//! │    config ──────────────► HttpOrderApi (checkout only)           │
//! │    store: Arc<JsonCartStore<FileBackend>>                        │
//! │        ├──► CartMutator          (cart commands)                 │
//! │        └──► CheckoutCoordinator  (checkout)                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use munch_checkout::{CheckoutCoordinator, ClientConfig, HttpOrderApi};
use munch_store::{CartMutator, FileBackend, JsonCartStore};
use tracing::debug;

use crate::error::ApiError;

/// Cart store used by the binary.
pub type FileCartStore = Arc<JsonCartStore<FileBackend>>;

#[derive(Debug, Clone)]
pub struct AppState {
    config: ClientConfig,
    store: FileCartStore,
}

impl AppState {
    /// Opens the cart store in `cart_dir`, else the configured directory.
    pub fn open(config: ClientConfig, cart_dir: Option<PathBuf>) -> Result<Self, ApiError> {
        let dir = cart_dir
            .or_else(|| config.cart_dir())
            .ok_or_else(|| ApiError::config("Could not determine cart directory"))?;
        debug!(dir = %dir.display(), "Cart directory determined");

        Ok(AppState {
            store: Arc::new(JsonCartStore::new(FileBackend::new(dir))),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn mutator(&self) -> CartMutator<FileCartStore> {
        CartMutator::new(Arc::clone(&self.store))
    }

    /// Builds the coordinator. Fails only on an unusable HTTP client setup.
    pub fn coordinator(&self) -> Result<CheckoutCoordinator<FileCartStore, HttpOrderApi>, ApiError> {
        let api = HttpOrderApi::new(&self.config)?;
        Ok(CheckoutCoordinator::new(Arc::clone(&self.store), api)
            .with_settings(self.config.checkout.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use munch_core::{MenuItem, Money, Vendor};
    use munch_store::AddResult;

    #[test]
    fn test_cart_persists_across_states() {
        let dir = tempfile::tempdir().unwrap();

        let first = AppState::open(ClientConfig::default(), Some(dir.path().to_path_buf())).unwrap();
        let added = first
            .mutator()
            .add_item(
                &Vendor::new("v1", "Dosa Corner"),
                &MenuItem::new("i1", "Masala Dosa", Money::from_major(100)),
            )
            .unwrap();
        assert!(matches!(added, AddResult::Added(_)));
        assert!(dir.path().join("cart.json").exists());

        let second = AppState::open(ClientConfig::default(), Some(dir.path().to_path_buf())).unwrap();
        let cart = second.mutator().cart();
        assert_eq!(cart.item("v1", "i1").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_configured_cart_dir_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.storage.cart_dir = Some(dir.path().join("carts"));

        let state = AppState::open(config, None).unwrap();
        assert!(state.coordinator().is_ok());
        assert_eq!(
            state.mutator().store().backend().dir(),
            dir.path().join("carts").as_path()
        );
    }
}
