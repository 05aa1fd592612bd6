//! Patron credentials for the order endpoint.

use std::fmt;

/// Environment variable read by [`EnvCredential::default`].
pub const AUTH_TOKEN_ENV: &str = "MUNCH_AUTH_TOKEN";

/// A bearer token.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token. Tokens that already carry a `Bearer ` prefix are
    /// sent unchanged.
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    /// True when the token is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        let token = self.0.trim();
        if token.starts_with("Bearer ") {
            token.to_string()
        } else {
            format!("Bearer {}", token)
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Supplies the current patron's credential, if logged in.
pub trait CredentialSource: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

/// A fixed credential, or none.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<Credential>);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        StaticCredential(Some(Credential::new(token)))
    }

    /// A source for a logged-out patron.
    pub fn none() -> Self {
        StaticCredential(None)
    }
}

impl CredentialSource for StaticCredential {
    fn credential(&self) -> Option<Credential> {
        self.0.clone()
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn from_var(var: impl Into<String>) -> Self {
        EnvCredential { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        EnvCredential::from_var(AUTH_TOKEN_ENV)
    }
}

impl CredentialSource for EnvCredential {
    fn credential(&self) -> Option<Credential> {
        std::env::var(&self.var)
            .ok()
            .map(Credential::new)
            .filter(|c| !c.is_blank())
    }
}
