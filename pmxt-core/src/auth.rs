//! Request authentication.
//!
//! Private implicit-API endpoints ask a [`Signer`] for headers before the
//! request goes out. Venue-specific signing schemes (HMAC, wallet signatures)
//! live with the venue adapters; this module provides the trait and
//! [`ApiKeySigner`], which covers venues that authenticate with a static key.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use std::fmt;

use crate::credentials::{Credentials, SecretString};
use crate::error::{Error, Result};
use crate::transport::Headers;
use crate::types::{ApiParams, HttpMethod};

/// Produces authentication headers for one request.
///
/// Implementations must fail with [`Error::Authentication`] when no credentials
/// are configured rather than returning an empty header map.
#[async_trait]
pub trait Signer: Send + Sync + fmt::Debug {
    /// Headers for `method` on the resolved `path` with the remaining `params`.
    async fn sign(&self, method: HttpMethod, path: &str, params: &ApiParams) -> Result<Headers>;
}

/// How the API key is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// Key in a named header, e.g. `X-API-KEY: <key>`.
    Header(String),
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// `Authorization: Basic base64(key:secret)`.
    Basic,
}

impl Default for AuthScheme {
    fn default() -> Self {
        Self::Header("X-API-KEY".to_string())
    }
}

/// Signer for venues that authenticate with a static API key.
#[derive(Debug, Clone, Default)]
pub struct ApiKeySigner {
    credentials: Credentials,
    scheme: AuthScheme,
    passphrase_header: Option<String>,
}

impl ApiKeySigner {
    /// Signer over `credentials` using the default `X-API-KEY` header.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            scheme: AuthScheme::default(),
            passphrase_header: None,
        }
    }

    /// Changes how the key is sent.
    pub fn with_scheme(mut self, scheme: AuthScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Also sends the passphrase, when configured, under `header`.
    pub fn with_passphrase_header(mut self, header: impl Into<String>) -> Self {
        self.passphrase_header = Some(header.into());
        self
    }

    fn api_key(&self) -> Result<&SecretString> {
        self.credentials
            .api_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::authentication("API key is required"))
    }
}

#[async_trait]
impl Signer for ApiKeySigner {
    async fn sign(&self, method: HttpMethod, path: &str, _params: &ApiParams) -> Result<Headers> {
        let key = self.api_key()?;
        let mut headers = Headers::new();

        match &self.scheme {
            AuthScheme::Header(name) => {
                headers.insert(name.clone(), key.expose_secret().to_string());
            }
            AuthScheme::Bearer => {
                headers.insert(
                    "Authorization".to_string(),
                    format!("Bearer {}", key.expose_secret()),
                );
            }
            AuthScheme::Basic => {
                let secret = self
                    .credentials
                    .secret
                    .as_ref()
                    .ok_or_else(|| Error::authentication("API secret is required"))?;
                let token = general_purpose::STANDARD.encode(format!(
                    "{}:{}",
                    key.expose_secret(),
                    secret.expose_secret()
                ));
                headers.insert("Authorization".to_string(), format!("Basic {token}"));
            }
        }

        if let (Some(header), Some(passphrase)) =
            (&self.passphrase_header, &self.credentials.passphrase)
        {
            headers.insert(header.clone(), passphrase.expose_secret().to_string());
        }

        tracing::trace!(method = %method, path, "Signed request");
        Ok(headers)
    }
}
