use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::StorageBackend;

/// In-memory backend.
///
/// Clones share the same map, so a test can keep one handle to inspect the
/// raw stored text while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    /// Creates a backend pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let backend = MemoryBackend::new();
        backend.put(key, value);
        backend
    }

    /// Returns the raw stored text for a key.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Stores raw text, bypassing any encoding.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> std::io::Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.put(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> std::io::Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let backend = MemoryBackend::new();
        let handle = backend.clone();

        backend.write("cart", "{}").unwrap();
        assert_eq!(handle.raw("cart").as_deref(), Some("{}"));

        handle.remove("cart").unwrap();
        assert_eq!(backend.read("cart").unwrap(), None);
        handle.remove("cart").unwrap();
    }
}
