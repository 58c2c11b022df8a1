//! # honeycomb-api: typed async client for the Honeycomb HTTP API
//!
//! Submit events, define queries, and fetch query results from a
//! [Honeycomb](https://docs.honeycomb.io/api/) style telemetry service.
//!
//! ## Overview
//!
//! - **Events**: send single events or ordered batches to a dataset
//! - **Queries**: create and fetch query specifications
//! - **Query results**: start computing a query and wait for it. The client
//!   polls with doubling backoff (10 ms, 20 ms, 40 ms, …) for up to ten
//!   attempts
//!
//! Every operation takes a [`tokio_util::sync::CancellationToken`]; firing it
//! abandons the in-flight request or backoff wait and returns
//! [`Error::Cancelled`].
//!
//! ## Feature flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `client` | yes     | reqwest transport, resource operations, result poller |
//! | `full`   | no      | Enable all features |
//!
//! ## Quick Start
//!
//! ```no_run
//! use honeycomb_api::prelude::*;
//! use serde_json::json;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let client = HoneycombClient::from_env()?;
//!     let cancel = CancellationToken::new();
//!
//!     // Send an event
//!     let event = json!({"service.name": "checkout", "duration_ms": 153});
//!     client
//!         .events()
//!         .send(&cancel, "my-dataset", event.as_object().unwrap())
//!         .await?;
//!
//!     // Define a query and wait for its result
//!     let spec = QuerySpecBuilder::new()
//!         .count()
//!         .breakdown("service.name")
//!         .time_range(3600)
//!         .build();
//!     let query = client.queries().create(&cancel, "my-dataset", &spec).await?;
//!     let query_id = query.id.unwrap_or_default();
//!
//!     match client.query_results().create_and_poll(&cancel, "my-dataset", &query_id).await {
//!         Ok(result) => {
//!             for row in result.data.as_ref().map(|d| d.results()).unwrap_or_default() {
//!                 println!("{row}");
//!             }
//!         }
//!         Err(Error::QueryTimedOut { id, .. }) => eprintln!("result {id} still running"),
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! [`Error::kind`] separates transport failures, decode failures, API errors
//! (with the HTTP status and the service's message), poll timeouts and local
//! validation errors.
//!
//! ## Architecture
//!
//! - [`client::HoneycombClient`]: entry point, built from a [`config::Config`]
//! - [`client::Invoker`]: request dispatch and response classification
//! - [`client::ResultPoller`]: bounded exponential-backoff result polling
//! - [`client::Transport`] / [`client::HttpTransport`]: pluggable transport
//! - [`types`]: query specifications, operators, result handles, events

pub mod builders;
pub mod config;
pub mod error;
pub mod types;
pub mod utils;

#[cfg(feature = "client")]
pub mod client;

/// Prelude module that re-exports commonly used types and traits.
///
/// # Example
///
/// ```
/// use honeycomb_api::prelude::*;
///
/// let spec = QuerySpecBuilder::new().count().build();
/// assert_eq!(spec.calculations, vec![CalculationSpec::count()]);
/// ```
pub mod prelude {
    pub use crate::types::{
        CalculationOp, CalculationSpec, EventData, FilterCombination, FilterOp, FilterSpec,
        FilterValue, OrderSpec, QueryResult, QueryResultData, QuerySpec, SendBatchRequest,
        SendBatchResponse, SortOrder,
    };

    pub use crate::error::{ApiError, Error, ErrorKind, Result};

    pub use crate::builders::QuerySpecBuilder;
    pub use crate::config::Config;

    #[cfg(feature = "client")]
    pub use crate::builders::ClientBuilder;

    #[cfg(feature = "client")]
    pub use crate::client::{Events, HoneycombClient, PollPolicy, Queries, QueryResults};
}

pub use builders::QuerySpecBuilder;
pub use config::Config;
pub use error::{ApiError, Error, ErrorKind, Result};
pub use types::*;

#[cfg(feature = "client")]
pub use builders::ClientBuilder;
