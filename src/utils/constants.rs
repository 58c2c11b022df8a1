//! Constants for the Honeycomb HTTP API.

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.honeycomb.io";

/// Version prefix of every API path.
pub const API_VERSION_SEGMENT: &str = "1";

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-Honeycomb-Team";

/// Environment variable read by [`crate::config::Config::from_env`] for the API key.
pub const API_KEY_ENV: &str = "HONEYCOMB_API_KEY";

/// Environment variable read by [`crate::config::Config::from_env`] for the API URL.
pub const API_URL_ENV: &str = "HONEYCOMB_API_URL";

/// Default `User-Agent`.
pub const DEFAULT_USER_AGENT: &str = concat!("honeycomb-api-rs/", env!("CARGO_PKG_VERSION"));

/// Maximum number of fetches the result poller performs.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;

/// First wait between result polls, in milliseconds. Doubles after every attempt.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
