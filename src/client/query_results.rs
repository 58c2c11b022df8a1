//! Query results: start computing a query and fetch its state.
//!
//! API docs: <https://docs.honeycomb.io/api/query-results/>

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::types::{CreateQueryResultRequest, QueryResult};

use super::invoker::Invoker;
use super::path::{require, ApiPath};
use super::poller::ResultPoller;

/// Query result operations of the Honeycomb API.
#[async_trait]
pub trait QueryResults: Send + Sync {
    /// Fetch the current state of a result (`GET /1/query_results/{dataset}/{id}`).
    async fn get(&self, cancel: &CancellationToken, dataset: &str, id: &str)
        -> Result<QueryResult>;

    /// Start computing a saved query (`POST /1/query_results/{dataset}`).
    ///
    /// The returned handle is usually not complete yet.
    async fn create(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        query_id: &str,
    ) -> Result<QueryResult>;

    /// Start computing a query and poll until the result is complete.
    async fn create_and_poll(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        query_id: &str,
    ) -> Result<QueryResult>;
}

/// [`QueryResults`] over the shared [`Invoker`].
#[derive(Debug, Clone)]
pub struct QueryResultsApi {
    invoker: Arc<Invoker>,
    poller: ResultPoller,
}

impl QueryResultsApi {
    pub fn new(invoker: Arc<Invoker>, poller: ResultPoller) -> Self {
        Self { invoker, poller }
    }

    pub fn poller(&self) -> &ResultPoller {
        &self.poller
    }
}

#[async_trait]
impl QueryResults for QueryResultsApi {
    async fn get(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        id: &str,
    ) -> Result<QueryResult> {
        require("dataset", dataset)?;
        require("query result id", id)?;
        self.invoker
            .get(cancel, ApiPath::query_result(dataset, id))
            .await
    }

    async fn create(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        query_id: &str,
    ) -> Result<QueryResult> {
        require("dataset", dataset)?;
        require("query id", query_id)?;
        let body = CreateQueryResultRequest {
            query_id: query_id.to_string(),
        };
        self.invoker
            .post(cancel, ApiPath::query_results(dataset), &body)
            .await
    }

    async fn create_and_poll(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        query_id: &str,
    ) -> Result<QueryResult> {
        let handle = self.create(cancel, dataset, query_id).await?;
        tracing::debug!(dataset, query_id, result_id = %handle.id, complete = handle.complete, "query result created");
        self.poller
            .poll(cancel, handle, |id| async move { self.get(cancel, dataset, &id).await })
            .await
    }
}
