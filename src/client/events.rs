//! Event submission.
//!
//! API docs: <https://docs.honeycomb.io/api/events/>

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::types::{EventData, SendBatchRequest, SendBatchResponse};

use super::invoker::Invoker;
use super::path::{require, ApiPath};

/// Event operations of the Honeycomb API.
#[async_trait]
pub trait Events: Send + Sync {
    /// Send a single event to a dataset (`POST /1/events/{dataset}`).
    async fn send(&self, cancel: &CancellationToken, dataset: &str, data: &EventData) -> Result<()>;

    /// Send a batch of events (`POST /1/batch/{dataset}`).
    ///
    /// The returned statuses line up with `events` by position.
    async fn send_batch(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        events: &[SendBatchRequest],
    ) -> Result<Vec<SendBatchResponse>>;
}

/// [`Events`] over the shared [`Invoker`].
#[derive(Debug, Clone)]
pub struct EventsApi {
    invoker: Arc<Invoker>,
}

impl EventsApi {
    pub fn new(invoker: Arc<Invoker>) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl Events for EventsApi {
    async fn send(&self, cancel: &CancellationToken, dataset: &str, data: &EventData) -> Result<()> {
        require("dataset", dataset)?;
        self.invoker
            .invoke_unit(cancel, Method::POST, ApiPath::events(dataset), Some(data))
            .await
    }

    async fn send_batch(
        &self,
        cancel: &CancellationToken,
        dataset: &str,
        events: &[SendBatchRequest],
    ) -> Result<Vec<SendBatchResponse>> {
        require("dataset", dataset)?;
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let statuses: Vec<SendBatchResponse> = self
            .invoker
            .post(cancel, ApiPath::batch(dataset), events)
            .await?;

        if statuses.len() != events.len() {
            return Err(Error::BatchLengthMismatch {
                sent: events.len(),
                received: statuses.len(),
            });
        }

        let rejected = statuses.iter().filter(|s| !s.is_accepted()).count();
        if rejected > 0 {
            tracing::debug!(dataset, rejected, total = events.len(), "batch had rejected events");
        }
        Ok(statuses)
    }
}
