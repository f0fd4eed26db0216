//! Runtime configuration and builder

use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::ProxyConfig;
use crate::credentials::{Credentials, SecretString};
use crate::error::{Error, Result};
use crate::pagination::{DEFAULT_PAGE_SIZE, DEFAULT_SNAPSHOT_TTL};
use crate::transport::{HttpConfig, RetryConfig};

/// Configuration of one [`ExchangeRuntime`](super::ExchangeRuntime).
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Exchange identifier; defaults to the venue's
    pub id: Option<String>,
    /// Display name; defaults to the venue's
    pub name: Option<String>,
    /// API key (zeroed on drop)
    pub api_key: Option<SecretString>,
    /// API secret or private key (zeroed on drop)
    pub secret: Option<SecretString>,
    /// Passphrase (zeroed on drop)
    pub passphrase: Option<SecretString>,
    /// How long a pagination snapshot stays valid
    pub snapshot_ttl: Duration,
    /// Page size used when a cursor arrives without a limit
    pub default_page_size: usize,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// `User-Agent` header
    pub user_agent: Option<String>,
    /// Outbound proxy
    pub proxy: Option<ProxyConfig>,
    /// Retry policy of the HTTP transport
    pub retry: RetryConfig,
    /// Replacement base URLs keyed by the catalog base URL they replace
    pub url_overrides: HashMap<String, String>,
    /// Venue-specific options
    pub options: HashMap<String, Value>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            api_key: None,
            secret: None,
            passphrase: None,
            snapshot_ttl: DEFAULT_SNAPSHOT_TTL,
            default_page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: None,
            proxy: None,
            retry: RetryConfig::default(),
            url_overrides: HashMap::new(),
            options: HashMap::new(),
        }
    }
}

impl RuntimeConfig {
    /// Starts a builder.
    ///
    /// ```rust
    /// use pmxt_core::runtime::RuntimeConfig;
    /// use std::time::Duration;
    ///
    /// let config = RuntimeConfig::builder()
    ///     .api_key("key")
    ///     .snapshot_ttl(Duration::from_secs(60))
    ///     .default_page_size(50)
    ///     .build();
    /// assert!(config.validate().is_ok());
    /// assert_eq!(config.default_page_size, 50);
    /// ```
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    /// Rejects values the runtime cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.snapshot_ttl.is_zero() {
            return Err(Error::invalid_argument("snapshot_ttl must be greater than 0"));
        }
        if self.default_page_size == 0 {
            return Err(Error::invalid_argument(
                "default_page_size must be greater than 0",
            ));
        }
        if self.timeout.is_zero() {
            return Err(Error::invalid_argument("timeout must be greater than 0"));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::invalid_argument(
                "connect_timeout must be greater than 0",
            ));
        }
        self.retry.validate()
    }

    /// Credentials for the signer.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            api_key: self.api_key.clone(),
            secret: self.secret.clone(),
            passphrase: self.passphrase.clone(),
        }
    }

    /// Settings for the default HTTP transport.
    pub fn http_config(&self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            proxy: self.proxy.clone(),
            retry: self.retry.clone(),
            ..defaults
        }
    }

    /// The base URL to use in place of `base_url`.
    pub fn resolve_base_url<'a>(&'a self, base_url: &'a str) -> &'a str {
        self.url_overrides
            .get(base_url)
            .map_or(base_url, String::as_str)
    }
}

/// Fluent builder for [`RuntimeConfig`].
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfigBuilder {
    config: RuntimeConfig,
}

impl RuntimeConfigBuilder {
    /// Builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the exchange id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.config.id = Some(id.into());
        self
    }

    /// Overrides the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(key));
        self
    }

    /// API secret or private key.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config.secret = Some(SecretString::new(secret));
        self
    }

    /// Passphrase.
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.config.passphrase = Some(SecretString::new(passphrase));
        self
    }

    /// Snapshot lifetime.
    pub fn snapshot_ttl(mut self, ttl: Duration) -> Self {
        self.config.snapshot_ttl = ttl;
        self
    }

    /// Page size for cursor requests without a limit.
    pub fn default_page_size(mut self, size: usize) -> Self {
        self.config.default_page_size = size;
        self
    }

    /// Request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Outbound proxy.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Outbound proxy by URL.
    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.config.proxy = Some(ProxyConfig::new(url));
        self
    }

    /// Retry policy.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Sends requests for catalog `base_url` to `url` instead.
    pub fn url_override(mut self, base_url: impl Into<String>, url: impl Into<String>) -> Self {
        self.config.url_overrides.insert(base_url.into(), url.into());
        self
    }

    /// One venue option.
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.options.insert(key.into(), value);
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> RuntimeConfig {
        self.config
    }
}
