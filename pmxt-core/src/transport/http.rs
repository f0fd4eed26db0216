//! `reqwest` transport with retry.

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::retry::{RetryConfig, RetryStrategy};
use super::{Headers, RawResponse, RequestOptions, Transport, query_pairs};
use crate::config::ProxyConfig;
use crate::error::{Error, RawError, RawResult, Result};
use crate::types::HttpMethod;

const BODY_PREVIEW_SIZE: usize = 200;

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// `User-Agent` header
    pub user_agent: String,
    /// Optional proxy
    pub proxy: Option<ProxyConfig>,
    /// Retry policy for transient failures
    pub retry: RetryConfig,
    /// Largest accepted response body in bytes
    pub max_response_size: usize,
    /// Idle keep-alive connections per host
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("pmxt-rust/{}", crate::VERSION),
            proxy: None,
            retry: RetryConfig::default(),
            max_response_size: 10 * 1024 * 1024,
            pool_max_idle_per_host: 10,
        }
    }
}

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
    retry: RetryStrategy,
}

impl HttpTransport {
    /// Builds the client.
    ///
    /// Fails with `InvalidArgument` on a bad proxy URL or if the TLS backend
    /// cannot be initialised.
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy.to_reqwest()?);
        }

        let client = builder
            .build()
            .map_err(|e| Error::invalid_argument(format!("Failed to build HTTP client: {e}")))?;
        let retry = RetryStrategy::new(config.retry.clone());

        Ok(Self {
            client,
            config,
            retry,
        })
    }

    /// The configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    #[instrument(
        name = "http_send_once",
        skip(self, options),
        fields(method = %method, url = %url, has_body = options.body.is_some())
    )]
    async fn send_once(
        &self,
        method: HttpMethod,
        url: &str,
        options: &RequestOptions,
    ) -> RawResult<RawResponse> {
        let mut request = self.client.request(method.into(), url);
        if let Some(query) = &options.query {
            request = request.query(&query_pairs(query));
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.read_response(response).await
    }

    async fn read_response(&self, response: Response) -> RawResult<RawResponse> {
        let status = response.status();
        let max_size = self.config.max_response_size;

        if let Some(len) = response.content_length()
            && len > max_size as u64
        {
            return Err(RawError::decode(format!(
                "Response size {len} bytes exceeds limit {max_size} bytes"
            )));
        }

        let headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_ascii_lowercase(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let bytes = response.bytes().await?;
        if bytes.len() > max_size {
            return Err(RawError::decode(format!(
                "Response size {} bytes exceeds limit {max_size} bytes",
                bytes.len()
            )));
        }

        let text = String::from_utf8_lossy(&bytes);
        let preview: String = text.chars().take(BODY_PREVIEW_SIZE).collect();
        debug!(
            status = status.as_u16(),
            body_length = bytes.len(),
            body_preview = %preview,
            "HTTP response received"
        );

        if !status.is_success() {
            return Err(RawError::Status {
                status: status.as_u16(),
                body: crate::error::truncate_message(text.into_owned()),
                retry_after,
            });
        }

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(text.into_owned()))
        };

        Ok(RawResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(name = "http_send", skip(self, options), fields(method = %method, url = %url))]
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> RawResult<RawResponse> {
        let mut attempt: u32 = 0;
        loop {
            match self.send_once(method, url, &options).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    attempt += 1;
                    if !self.retry.should_retry(&err, attempt) {
                        debug!(attempt, error = %err, "Request failed, not retrying");
                        return Err(err);
                    }
                    let delay = self.retry.calculate_delay(attempt, &err);
                    warn!(
                        attempt,
                        delay_ms = %delay.as_millis(),
                        error = %err,
                        "Request failed, retrying after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
