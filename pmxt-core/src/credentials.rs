//! Credential types that zero their memory on drop.
//!
//! ```rust
//! use pmxt_core::credentials::{Credentials, SecretString};
//!
//! let creds = Credentials::new().api_key("key-123").secret("s3cr3t");
//! assert_eq!(creds.api_key.as_ref().map(SecretString::expose_secret), Some("key-123"));
//! assert_eq!(format!("{creds:?}").contains("s3cr3t"), false);
//! ```

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string that is zeroed when dropped and redacted in `Debug`/`Display`.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wraps a secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The secret value. Use it immediately; don't keep copies around.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Venue credentials. Every field is optional; signers decide what they need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// API key
    pub api_key: Option<SecretString>,
    /// API secret or private key
    pub secret: Option<SecretString>,
    /// Passphrase, for venues that use one
    pub passphrase: Option<SecretString>,
}

impl Credentials {
    /// No credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<SecretString>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the secret.
    pub fn secret(mut self, secret: impl Into<SecretString>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Sets the passphrase.
    pub fn passphrase(mut self, passphrase: impl Into<SecretString>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// Whether nothing usable is configured.
    pub fn is_empty(&self) -> bool {
        [&self.api_key, &self.secret, &self.passphrase]
            .iter()
            .all(|v| v.as_ref().is_none_or(SecretString::is_empty))
    }
}
