//! Request dispatch: encode, send, classify.
//!
//! [`Invoker`] turns a typed operation into one [`ApiRequest`], runs it on a
//! [`Transport`] under a cancellation token, and maps the response to exactly
//! one outcome: a decoded value, unit, or an [`Error`]. It never retries.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, Error, Result};

use super::path::ApiPath;
use super::transport::{ApiRequest, RawResponse, Transport};

/// Stateless request dispatcher over a shared [`Transport`].
#[derive(Clone)]
pub struct Invoker {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker").finish_non_exhaustive()
    }
}

impl Invoker {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a request and decode the 2xx body into `T`.
    pub async fn invoke<T, B>(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: ApiPath,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.exchange(cancel, method, &path, body).await?;
        serde_json::from_slice(&response.body)
            .map_err(|e| Error::Decode(format!("failed to decode response from {path}: {e}")))
    }

    /// Send a request whose 2xx response carries nothing of interest.
    pub async fn invoke_unit<B>(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: ApiPath,
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.exchange(cancel, method, &path, body).await.map(|_| ())
    }

    /// `GET path`, decoded into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: ApiPath,
    ) -> Result<T> {
        self.invoke::<T, ()>(cancel, Method::GET, path, None).await
    }

    /// `POST path` with a JSON body, decoded into `T`.
    pub async fn post<T, B>(&self, cancel: &CancellationToken, path: ApiPath, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.invoke(cancel, Method::POST, path, Some(body)).await
    }

    async fn exchange<B>(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &ApiPath,
        body: Option<&B>,
    ) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| Error::Serialize(e.to_string()))?;

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        tracing::debug!(%method, %path, "sending request");
        let request = ApiRequest {
            method: method.clone(),
            path: path.clone(),
            body,
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(%method, %path, "request cancelled");
                return Err(Error::Cancelled);
            }
            response = self.transport.execute(request) => response?,
        };

        tracing::debug!(%method, %path, status = response.status, "received response");

        if !response.is_success() {
            let text = String::from_utf8_lossy(&response.body);
            return Err(ApiError::from_response(response.status, text).into());
        }
        Ok(response)
    }
}
