//! Polling of asynchronously computed query results.
//!
//! Query results are computed by the service in the background. The
//! [`ResultPoller`] re-fetches a result handle with doubling waits until it
//! reports `complete`, a fetch fails, the attempt budget runs out, or the
//! caller cancels.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::types::QueryResult;
use crate::utils::constants::{DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS};

/// Attempt budget and backoff for [`ResultPoller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of fetches.
    pub max_attempts: u32,
    /// Wait after the first incomplete fetch. Doubles after every attempt.
    pub initial_interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            initial_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl PollPolicy {
    /// The wait after each attempt: `initial, 2*initial, 4*initial, ...`.
    pub fn intervals(&self) -> impl Iterator<Item = Duration> {
        let first = self.initial_interval;
        (0..self.max_attempts).scan(first, |next, _| {
            let current = *next;
            *next = next.saturating_mul(2);
            Some(current)
        })
    }

    /// Sum of all waits when the result never completes.
    pub fn worst_case_wait(&self) -> Duration {
        self.intervals().fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Suspends the poller between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Drives a query result handle to completion.
///
/// Holds no per-poll state; one poller can serve any number of concurrent
/// polls.
#[derive(Clone)]
pub struct ResultPoller {
    policy: PollPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for ResultPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultPoller")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for ResultPoller {
    fn default() -> Self {
        Self::new(PollPolicy::default(), Arc::new(TokioSleeper))
    }
}

impl ResultPoller {
    pub fn new(policy: PollPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Poll until `handle` is complete.
    ///
    /// If `handle` is already complete it is returned as is. Otherwise
    /// `fetch` is called with the handle id up to `max_attempts` times. A
    /// fetch error ends the poll with that error. Exhausting the budget
    /// yields [`Error::QueryTimedOut`] carrying the last observed handle.
    pub async fn poll<F, Fut>(
        &self,
        cancel: &CancellationToken,
        handle: QueryResult,
        mut fetch: F,
    ) -> Result<QueryResult>
    where
        F: FnMut(String) -> Fut + Send,
        Fut: Future<Output = Result<QueryResult>> + Send,
    {
        if handle.complete {
            return Ok(handle);
        }

        let id = handle.id.clone();
        let mut last = handle;

        for (attempt, interval) in (1..=self.policy.max_attempts).zip(self.policy.intervals()) {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let current = fetch(id.clone()).await?;
            if current.complete {
                tracing::debug!(%id, attempt, "query result complete");
                return Ok(current);
            }
            last = current;

            tracing::debug!(%id, attempt, wait_ms = interval.as_millis() as u64, "query result not ready");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = self.sleeper.sleep(interval) => {}
            }
        }

        tracing::warn!(%id, attempts = self.policy.max_attempts, "query result did not complete");
        Err(Error::QueryTimedOut {
            id,
            attempts: self.policy.max_attempts,
            last: Box::new(last),
        })
    }
}
