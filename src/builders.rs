//! Builder patterns for ergonomic construction of query specifications and
//! clients.

use crate::types::*;

/// Builder for a [`QuerySpec`].
///
/// # Example
///
/// ```
/// use honeycomb_api::builders::QuerySpecBuilder;
/// use honeycomb_api::types::{CalculationOp, FilterSpec, SortOrder};
///
/// let spec = QuerySpecBuilder::new()
///     .count()
///     .calculation(CalculationOp::P99, "duration_ms")
///     .filter(FilterSpec::exists("trace.trace_id"))
///     .breakdown("service.name")
///     .order_by_calculation(CalculationOp::Count, SortOrder::Descending)
///     .limit(100)
///     .time_range(3600)
///     .build();
///
/// assert_eq!(spec.calculations.len(), 2);
/// assert_eq!(spec.breakdowns, vec!["service.name".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuerySpecBuilder {
    spec: QuerySpec,
}

impl QuerySpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `COUNT` calculation.
    pub fn count(mut self) -> Self {
        self.spec.calculations.push(CalculationSpec::count());
        self
    }

    /// Add a calculation over a column.
    pub fn calculation(mut self, op: CalculationOp, column: impl Into<String>) -> Self {
        self.spec.calculations.push(CalculationSpec::of(op, column));
        self
    }

    /// Add a filter.
    pub fn filter(mut self, filter: FilterSpec) -> Self {
        self.spec.filters.push(filter);
        self
    }

    /// Set how filters are combined.
    pub fn filter_combination(mut self, combination: FilterCombination) -> Self {
        self.spec.filter_combination = Some(combination);
        self
    }

    /// Add a breakdown column.
    pub fn breakdown(mut self, column: impl Into<String>) -> Self {
        self.spec.breakdowns.push(column.into());
        self
    }

    /// Order by a breakdown column.
    pub fn order_by_column(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.spec.orders.push(OrderSpec {
            op: None,
            column: Some(column.into()),
            order: Some(order),
        });
        self
    }

    /// Order by a column-less calculation such as `COUNT`.
    pub fn order_by_calculation(mut self, op: CalculationOp, order: SortOrder) -> Self {
        self.spec.orders.push(OrderSpec {
            op: Some(op),
            column: None,
            order: Some(order),
        });
        self
    }

    /// Add an arbitrary order term.
    pub fn order(mut self, order: OrderSpec) -> Self {
        self.spec.orders.push(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.spec.limit = Some(limit);
        self
    }

    /// Relative time range in seconds.
    pub fn time_range(mut self, seconds: u32) -> Self {
        self.spec.time_range = Some(seconds);
        self
    }

    /// Absolute start, unix seconds.
    pub fn start_time(mut self, unix_seconds: i64) -> Self {
        self.spec.start_time = Some(unix_seconds);
        self
    }

    /// Absolute end, unix seconds.
    pub fn end_time(mut self, unix_seconds: i64) -> Self {
        self.spec.end_time = Some(unix_seconds);
        self
    }

    pub fn granularity(mut self, seconds: u32) -> Self {
        self.spec.granularity = Some(seconds);
        self
    }

    pub fn build(self) -> QuerySpec {
        self.spec
    }
}

/// Builder for [`crate::client::HoneycombClient`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use honeycomb_api::builders::ClientBuilder;
/// use honeycomb_api::client::PollPolicy;
/// use honeycomb_api::config::Config;
/// use std::time::Duration;
///
/// let client = ClientBuilder::new(Config::new("my-api-key"))
///     .with_timeout(Duration::from_secs(30))
///     .with_poll_policy(PollPolicy {
///         max_attempts: 20,
///         initial_interval: Duration::from_millis(50),
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "client")]
pub struct ClientBuilder {
    config: crate::config::Config,
    http_client: Option<reqwest::Client>,
    transport: Option<std::sync::Arc<dyn crate::client::Transport>>,
    poll_policy: crate::client::PollPolicy,
    sleeper: std::sync::Arc<dyn crate::client::Sleeper>,
}

#[cfg(feature = "client")]
impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("poll_policy", &self.poll_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "client")]
impl ClientBuilder {
    /// Create a new builder from a configuration.
    pub fn new(config: crate::config::Config) -> Self {
        Self {
            config,
            http_client: None,
            transport: None,
            poll_policy: crate::client::PollPolicy::default(),
            sleeper: std::sync::Arc::new(crate::client::TokioSleeper),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a custom HTTP header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Reuse an existing `reqwest::Client` (connection pool, TLS settings).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Use a custom transport instead of HTTP. Config values are then not
    /// applied to requests.
    pub fn with_transport(mut self, transport: std::sync::Arc<dyn crate::client::Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the attempt budget and backoff of the result poller.
    pub fn with_poll_policy(mut self, policy: crate::client::PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    /// Replace how the result poller waits between attempts.
    pub fn with_sleeper(mut self, sleeper: std::sync::Arc<dyn crate::client::Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Build the client.
    pub fn build(self) -> crate::error::Result<crate::client::HoneycombClient> {
        use crate::client::{HoneycombClient, HttpTransport, ResultPoller};

        if self.poll_policy.max_attempts == 0 {
            return Err(crate::error::Error::Config(
                "poll policy needs at least one attempt".to_string(),
            ));
        }

        let transport: std::sync::Arc<dyn crate::client::Transport> = match self.transport {
            Some(transport) => transport,
            None => match self.http_client {
                Some(client) => std::sync::Arc::new(HttpTransport::with_client(&self.config, client)?),
                None => std::sync::Arc::new(HttpTransport::new(&self.config)?),
            },
        };

        let poller = ResultPoller::new(self.poll_policy, self.sleeper);
        Ok(HoneycombClient::from_parts(transport, poller))
    }
}
