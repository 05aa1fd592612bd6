//! # Storage Backends
//!
//! Raw string key-value storage underneath [`crate::JsonCartStore`].
//!
//! A backend knows nothing about carts. It stores opaque strings and must
//! make each `write` atomic: a concurrent or later `read` sees either the old
//! value or the new one, never a mix.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// A synchronous string key-value store.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored value, `Ok(None)` when the key is absent.
    fn read(&self, key: &str) -> std::io::Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> std::io::Result<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> std::io::Result<()>;
}
