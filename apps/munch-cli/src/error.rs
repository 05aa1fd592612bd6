//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in munch                                  │
//! │                                                                         │
//! │  munch add ... / munch checkout                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Cart rule? ───── CoreError::ItemNotInCart ───────┐              │  │
//! │  │  Storage? ─────── StoreError::Io ─────────────────┤              │  │
//! │  │  Checkout? ────── CheckoutError::Server ──────────┴─► ApiError ─►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stdout: {"code":"SERVER_ERROR","message":"Food cart is closed",       │
//! │           "retryable":true}                                            │
//! │  exit status: 1                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use munch_checkout::CheckoutError;
use munch_core::CoreError;
use munch_store::{MutateError, StoreError};
use serde::Serialize;

/// Error printed when a command fails.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Item i9 from vendor v1 is not in the cart",
///   "retryable": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable message, shown as-is to the patron
    pub message: String,

    /// Whether running the same command again may succeed
    pub retryable: bool,
}

/// Error codes for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Vendor or item is not in the cart
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart rule violated (too many items)
    CartError,

    /// Cart file could not be written
    StorageError,

    /// Another checkout is still waiting for the server
    CheckoutInProgress,

    /// The order request never got a response
    NetworkError,

    /// The server rejected the credential
    Unauthorized,

    /// The server rejected the order
    ServerError,

    /// Configuration is invalid or unreadable
    ConfigError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new, non-retryable API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConfigError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

/// Converts cart rule violations.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotInCart { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::CartTooLarge { .. } => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts storage failures. The underlying cause is logged, not shown.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Cart storage failed: {}", err);
        ApiError::new(ErrorCode::StorageError, "Could not save the cart")
    }
}

impl From<MutateError> for ApiError {
    fn from(err: MutateError) -> Self {
        match err {
            MutateError::Cart(e) => e.into(),
            MutateError::Store(e) => e.into(),
        }
    }
}

/// Converts checkout failures, keeping server messages verbatim.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        let retryable = err.is_retryable();
        let code = match &err {
            CheckoutError::Validation(_) => ErrorCode::ValidationError,
            CheckoutError::AlreadyInProgress => ErrorCode::CheckoutInProgress,
            CheckoutError::Network(_) => ErrorCode::NetworkError,
            CheckoutError::Unauthorized(_) => ErrorCode::Unauthorized,
            CheckoutError::Server { .. } => ErrorCode::ServerError,
            CheckoutError::InvalidConfig(_)
            | CheckoutError::ConfigLoadFailed(_)
            | CheckoutError::ConfigSaveFailed(_) => ErrorCode::ConfigError,
        };
        ApiError::new(code, err.to_string()).retryable(retryable)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Failed to encode output: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use munch_core::ValidationError;
    use serde_json::json;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err = ApiError::from(CoreError::item_not_in_cart("v1", "i9"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Item i9 from vendor v1 is not in the cart");

        let err = ApiError::from(CoreError::CartTooLarge { max: 100 });
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_server_message_is_kept_verbatim() {
        let err = ApiError::from(CheckoutError::Server {
            status: 503,
            message: "Food cart is closed".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"code":"SERVER_ERROR","message":"Food cart is closed","retryable":true})
        );
    }

    #[test]
    fn test_checkout_preconditions() {
        let err = ApiError::from(CheckoutError::from(ValidationError::MissingCredential));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Please login to place an order");
        assert!(!err.retryable);

        let err = ApiError::from(CheckoutError::Unauthorized("Session expired".into()));
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert!(!err.retryable);
    }

    #[test]
    fn test_storage_error_hides_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ApiError::from(MutateError::from(StoreError::io("cart", io)));
        assert_eq!(err.code, ErrorCode::StorageError);
        assert_eq!(err.message, "Could not save the cart");
    }
}
