//! The top-level client.

use std::sync::Arc;

use crate::builders::ClientBuilder;
use crate::config::Config;
use crate::error::Result;

use super::events::EventsApi;
use super::invoker::Invoker;
use super::poller::ResultPoller;
use super::queries::QueriesApi;
use super::query_results::QueryResultsApi;
use super::transport::{HttpTransport, Transport};

/// Client for the Honeycomb API.
///
/// Every resource group shares one [`Invoker`] and through it one transport
/// and connection pool. Cloning the client is cheap.
///
/// # Construction
///
/// ```no_run
/// use honeycomb_api::client::HoneycombClient;
/// use honeycomb_api::config::Config;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Explicit configuration:
/// let client = HoneycombClient::new(Config::new("my-api-key"))?;
///
/// // From HONEYCOMB_API_KEY / HONEYCOMB_API_URL:
/// let client = HoneycombClient::from_env()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HoneycombClient {
    invoker: Arc<Invoker>,
    events: EventsApi,
    queries: QueriesApi,
    query_results: QueryResultsApi,
}

impl HoneycombClient {
    /// Create a client over HTTP with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::from_parts(Arc::new(transport), ResultPoller::default()))
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    /// Create a client on a custom transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::from_parts(transport, ResultPoller::default())
    }

    /// Start a [`ClientBuilder`].
    pub fn builder(config: Config) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    pub(crate) fn from_parts(transport: Arc<dyn Transport>, poller: ResultPoller) -> Self {
        let invoker = Arc::new(Invoker::new(transport));
        let query_results = QueryResultsApi::new(invoker.clone(), poller);
        Self {
            events: EventsApi::new(invoker.clone()),
            queries: QueriesApi::new(invoker.clone(), query_results.clone()),
            query_results,
            invoker,
        }
    }

    /// Event submission.
    pub fn events(&self) -> &EventsApi {
        &self.events
    }

    /// Query specifications.
    pub fn queries(&self) -> &QueriesApi {
        &self.queries
    }

    /// Query results.
    pub fn query_results(&self) -> &QueryResultsApi {
        &self.query_results
    }

    /// The shared request dispatcher, for endpoints without a typed wrapper.
    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }
}
