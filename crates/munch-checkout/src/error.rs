//! # Checkout Error Types
//!
//! Error types for order submission and client configuration.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Precondition   │  │   Transport     │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  Network        │  │  Unauthorized (401)     │ │
//! │  │  AlreadyIn-     │  │  (DNS, connect, │  │  Server { status,       │ │
//! │  │   Progress      │  │   timeout)      │  │           message }     │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Configuration: InvalidConfig, ConfigLoadFailed,                │   │
//! │  │                 ConfigSaveFailed                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is never touched by a failed submission, whatever the category.

use munch_core::ValidationError;
use thiserror::Error;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Checkout error type.
///
/// Server messages are surfaced verbatim, so `Display` for `Unauthorized`
/// and `Server` is the message alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Precondition Errors
    // =========================================================================
    /// Empty cart, zero total or missing credential.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another submission is still waiting for the server.
    #[error("An order is already being placed")]
    AlreadyInProgress,

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// The server rejected the credential (HTTP 401).
    #[error("{0}")]
    Unauthorized(String),

    /// Any other non-2xx response.
    #[error("{message}")]
    Server { status: u16, message: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid checkout configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for CheckoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CheckoutError::Network("request timed out".to_string())
        } else if err.is_builder() {
            CheckoutError::InvalidConfig(err.to_string())
        } else {
            CheckoutError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for CheckoutError {
    fn from(err: url::ParseError) -> Self {
        CheckoutError::InvalidConfig(format!("invalid URL: {}", err))
    }
}

impl From<std::io::Error> for CheckoutError {
    fn from(err: std::io::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CheckoutError {
    fn from(err: toml::ser::Error) -> Self {
        CheckoutError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl CheckoutError {
    /// Returns true if the patron should be offered a "try again" button.
    ///
    /// ## Retryable Errors
    /// - Network failures and timeouts
    /// - 5xx responses, 408 and 429
    ///
    /// ## Non-Retryable Errors
    /// - Validation (fix the cart or log in first)
    /// - Unauthorized (log in again first)
    /// - Other 4xx responses
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::Network(_) => true,
            CheckoutError::Server { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::InvalidConfig(_)
                | CheckoutError::ConfigLoadFailed(_)
                | CheckoutError::ConfigSaveFailed(_)
        )
    }
}
