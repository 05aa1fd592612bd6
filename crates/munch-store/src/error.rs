//! # Store Error Types
//!
//! Error types for persistence and persisted mutations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError ─────────┐                                                 │
//! │                      ▼                                                  │
//! │  CoreError ────► MutateError (this module)                             │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  ApiError (in CLI) ← Serialized for the caller                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note that a *read* never produces a `StoreError`: unreadable or corrupt
//! data loads as an empty cart.

use munch_core::CoreError;
use thiserror::Error;

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not write or remove a key.
    ///
    /// ## When This Occurs
    /// - Disk full or read-only file system
    /// - Cart directory removed while the app is running
    /// - Permission denied
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The cart could not be encoded.
    #[error("Failed to encode cart: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Creates an Io error for a given key.
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            key: key.into(),
            source,
        }
    }
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of a persisted cart mutation.
///
/// In both cases the stored cart keeps its previous value.
#[derive(Debug, Error)]
pub enum MutateError {
    /// The transition itself was rejected (bad input, missing item).
    #[error(transparent)]
    Cart(#[from] CoreError),

    /// The transition succeeded in memory but could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for Results with MutateError.
pub type MutateResult<T> = Result<T, MutateError>;
