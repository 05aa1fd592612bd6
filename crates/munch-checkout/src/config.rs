//! # Client Configuration
//!
//! Where orders go, how long to wait, and where the cart lives on disk.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MUNCH_API_URL=http://localhost:4000                                │
//! │     MUNCH_CART_DIR=/tmp/munch                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/munch/munch.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.mallmunch.munch/munch.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Hosted backend, 30 s timeout, platform data dir                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # munch.toml
//! [api]
//! base_url = "https://mall-munch-backend.onrender.com"
//! order_path = "/mall/placeOrder"
//! request_timeout_secs = 30
//!
//! [checkout]
//! success_redirect = "/Foodcart/orders"
//! fallback_error_message = "Failed to place order"
//!
//! [storage]
//! cart_dir = "/var/lib/munch"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// API Settings
// =============================================================================

/// Order endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Scheme and host of the backend, e.g. `https://mall-munch-backend.onrender.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the place-order endpoint, appended to `base_url`.
    #[serde(default = "default_order_path")]
    pub order_path: String,

    /// Whole-request timeout (seconds). A timeout is a failed submission.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://mall-munch-backend.onrender.com".to_string()
}

fn default_order_path() -> String {
    "/mall/placeOrder".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            order_path: default_order_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Checkout Settings
// =============================================================================

/// Checkout behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Where to send the patron after a placed order when the server gives
    /// no redirect of its own.
    #[serde(default = "default_success_redirect")]
    pub success_redirect: String,

    /// Message shown when a failed response carries none.
    #[serde(default = "default_fallback_error_message")]
    pub fallback_error_message: String,
}

fn default_success_redirect() -> String {
    "/Foodcart/orders".to_string()
}

fn default_fallback_error_message() -> String {
    "Failed to place order".to_string()
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            success_redirect: default_success_redirect(),
            fallback_error_message: default_fallback_error_message(),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Cart storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding `cart.json`. Defaults to the platform data dir.
    #[serde(default)]
    pub cart_dir: Option<PathBuf>,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ClientConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (munch.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CheckoutResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CheckoutResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CheckoutError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CheckoutError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| CheckoutError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CheckoutResult<()> {
        let url = self.order_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CheckoutError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if !self.api.order_path.starts_with('/') {
            return Err(CheckoutError::InvalidConfig(
                "order_path must start with '/'".into(),
            ));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(CheckoutError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.checkout.success_redirect.trim().is_empty() {
            return Err(CheckoutError::InvalidConfig(
                "success_redirect must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("MUNCH_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(path) = lookup("MUNCH_ORDER_PATH") {
            self.api.order_path = path;
        }

        if let Some(secs) = lookup("MUNCH_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.request_timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid MUNCH_REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Some(dir) = lookup("MUNCH_CART_DIR") {
            debug!(dir = %dir, "Overriding cart directory from environment");
            self.storage.cart_dir = Some(PathBuf::from(dir));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "mallmunch", "munch")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("munch.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Full URL of the place-order endpoint: `base_url` + `order_path`.
    pub fn order_url(&self) -> CheckoutResult<Url> {
        let joined = format!(
            "{}{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.order_path
        );
        Ok(Url::parse(&joined)?)
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Directory for the cart file: configured, else the platform data dir.
    pub fn cart_dir(&self) -> Option<PathBuf> {
        self.storage
            .cart_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
    }
}
