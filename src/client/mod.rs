//! Honeycomb API client.
//!
//! - [`HoneycombClient`]: owns one [`Invoker`] and hands out the resource
//!   groups ([`EventsApi`], [`QueriesApi`], [`QueryResultsApi`])
//! - [`Events`] / [`Queries`] / [`QueryResults`]: one trait per resource
//!   kind, so callers can substitute their own implementations
//! - [`Invoker`]: encodes requests, honours cancellation, classifies
//!   responses
//! - [`Transport`] / [`HttpTransport`]: pluggable transport layer
//! - [`ResultPoller`]: waits for asynchronously computed query results
//!
//! # Quick Start
//!
//! ```no_run
//! use honeycomb_api::client::{HoneycombClient, Queries};
//! use honeycomb_api::config::Config;
//! use honeycomb_api::types::{CalculationSpec, QuerySpec};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HoneycombClient::new(Config::new("my-api-key"))?;
//! let cancel = CancellationToken::new();
//!
//! let spec = QuerySpec {
//!     calculations: vec![CalculationSpec::count()],
//!     ..Default::default()
//! };
//! let query = client.queries().create(&cancel, "my-dataset", &spec).await?;
//! let result = client
//!     .queries()
//!     .get_query_result(&cancel, "my-dataset", query.id.as_deref().unwrap_or_default())
//!     .await?;
//! println!("{} rows", result.data.map(|d| d.results().len()).unwrap_or(0));
//! # Ok(())
//! # }
//! ```

mod events;
mod honeycomb_client;
mod invoker;
mod path;
mod poller;
mod queries;
mod query_results;
mod transport;

pub use events::{Events, EventsApi};
pub use honeycomb_client::HoneycombClient;
pub use invoker::Invoker;
pub use path::ApiPath;
pub use poller::{PollPolicy, ResultPoller, Sleeper, TokioSleeper};
pub use queries::{Queries, QueriesApi};
pub use query_results::{QueryResults, QueryResultsApi};
pub use transport::{ApiRequest, HttpTransport, RawResponse, Transport};
