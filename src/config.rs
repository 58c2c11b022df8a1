//! Client configuration.
//!
//! A [`Config`] is an explicit value handed to the client at construction.
//! Nothing is read from process-wide state after that point.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::utils::constants::{API_KEY_ENV, API_URL_ENV, DEFAULT_API_URL, DEFAULT_USER_AGENT};

/// Connection settings for a client.
#[derive(Clone)]
pub struct Config {
    /// API key sent in the `X-Honeycomb-Team` header.
    pub api_key: String,
    /// Base URL of the API. Defaults to `https://api.honeycomb.io`.
    pub base_url: String,
    /// Per-request timeout. Defaults to 60 seconds.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Additional HTTP headers to include on every request.
    pub headers: HashMap<String, String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Config {
    /// Configuration for the default endpoint with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(60),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HashMap::new(),
        }
    }

    /// Read `HONEYCOMB_API_KEY` and, if set, `HONEYCOMB_API_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config(format!("{API_KEY_ENV} is not set")))?;
        let mut config = Self::new(api_key);
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.is_empty()) {
            config.base_url = url;
        }
        Ok(config)
    }

    /// Override the base URL (builder-style).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the request timeout (builder-style).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the user agent (builder-style).
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a custom header (builder-style).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Check that the key is present and the base URL is absolute http(s).
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("API key is empty".to_string()));
        }
        let scheme_ok =
            self.base_url.starts_with("https://") || self.base_url.starts_with("http://");
        if !scheme_ok {
            return Err(Error::Config(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}
