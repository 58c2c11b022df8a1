//! Transport layer for Honeycomb API communication.
//!
//! Provides the `Transport` trait for one raw HTTP exchange, and
//! `HttpTransport`, which performs it with `reqwest` and attaches the
//! authentication and content headers the service requires.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::utils::constants::API_KEY_HEADER;

use super::path::ApiPath;

/// One outgoing request: method, path and optional JSON body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: ApiPath,
    /// Already-encoded JSON body. `None` sends no body at all.
    pub body: Option<Vec<u8>>,
}

/// Status and body of a response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport abstraction for the Honeycomb API.
///
/// Implementations perform one exchange and report transport failures
/// (connection refused, timeout) as errors. Any response that arrived,
/// whatever its status, is returned as a [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and read the full response body.
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// HTTP transport using `reqwest`.
///
/// Cloning is cheap and shares the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use honeycomb_api::client::HttpTransport;
/// use honeycomb_api::config::Config;
///
/// let transport = HttpTransport::new(&Config::new("my-api-key")).unwrap();
/// assert_eq!(transport.base_url().as_str(), "https://api.honeycomb.io/");
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport with its own `reqwest::Client`, configured with
    /// the timeout and user agent from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Self::with_client(config, client)
    }

    /// Create a transport on an existing `reqwest::Client`.
    ///
    /// Useful to share a connection pool or configure TLS externally. The
    /// client's own timeout and user agent apply.
    pub fn with_client(config: &Config, client: reqwest::Client) -> Result<Self> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("invalid base URL '{}': {e}", config.base_url)))?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("invalid value for header '{key}': {e}")))?;
            headers.insert(name, value);
        }

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::Config("API key contains invalid header characters".to_string()))?;
        api_key.set_sensitive(true);
        let api_key_header = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
            .map_err(|e| Error::Config(format!("invalid API key header name: {e}")))?;
        headers.insert(api_key_header, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            client,
            base_url,
            headers,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = request.path.to_url(&self.base_url)?;

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(self.headers.clone());
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(format!("request timed out: {e}"))
            } else if e.is_connect() {
                Error::Transport(format!("connection failed: {e}"))
            } else {
                Error::Transport(format!("HTTP request failed: {e}"))
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(format!("timed out reading response body: {e}"))
            } else {
                Error::Transport(format!("failed to read response body: {e}"))
            }
        })?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
