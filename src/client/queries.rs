//! Query specifications.
//!
//! API docs: <https://docs.honeycomb.io/api/queries/>

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::types::{QueryResult, QuerySpec};

use super::invoker::Invoker;
use super::path::{require, ApiPath};
use super::query_results::{QueryResults, QueryResultsApi};

/// Query operations of the Honeycomb API.
#[async_trait]
pub trait Queries: Send + Sync {
    /// Fetch a query by id (`GET /1/queries/{dataset}/{id}`).
    async fn get(&self, cancel: &CancellationToken, dataset: &str, id: &str) -> Result<QuerySpec>;

    /// Create a query (`POST /1/queries/{dataset}`). `spec.id` must be unset;
    /// the returned spec carries the id assigned by the service.
    async fn create(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        spec: &QuerySpec,
    ) -> Result<QuerySpec>;

    /// Run a saved query and wait for its result.
    async fn get_query_result(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        query_id: &str,
    ) -> Result<QueryResult>;
}

/// [`Queries`] over the shared [`Invoker`].
#[derive(Debug, Clone)]
pub struct QueriesApi {
    invoker: Arc<Invoker>,
    results: QueryResultsApi,
}

impl QueriesApi {
    pub fn new(invoker: Arc<Invoker>, results: QueryResultsApi) -> Self {
        Self { invoker, results }
    }
}

#[async_trait]
impl Queries for QueriesApi {
    async fn get(&self, cancel: &CancellationToken, dataset: &str, id: &str) -> Result<QuerySpec> {
        require("dataset", dataset)?;
        require("query id", id)?;
        self.invoker.get(cancel, ApiPath::query(dataset, id)).await
    }

    async fn create(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        spec: &QuerySpec,
    ) -> Result<QuerySpec> {
        require("dataset", dataset)?;
        if spec.id.is_some() {
            return Err(Error::InvalidArgument(
                "query id is assigned by the service and must not be set on create".to_string(),
            ));
        }
        self.invoker
            .post(cancel, ApiPath::queries(dataset), spec)
            .await
    }

    async fn get_query_result(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        query_id: &str,
    ) -> Result<QueryResult> {
        self.results.create_and_poll(cancel, dataset, query_id).await
    }
}
