//! Error types for the Honeycomb client.
//!
//! Every failure is returned as an [`Error`]. The variants fall into a small
//! number of kinds (see [`ErrorKind`]) so callers can tell a dropped
//! connection from a malformed response, a rejected request, or a query that
//! never finished computing.

use serde::Deserialize;

use crate::types::QueryResult;

// ---------------------------------------------------------------------------
// API error
// ---------------------------------------------------------------------------

/// A non-2xx response from the service.
///
/// `status` is always the HTTP status of the response. `error_type` and
/// `message` are filled from the JSON error envelope when the service sent
/// one; `body` keeps the raw response text either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error type, if provided.
    pub error_type: Option<String>,
    /// Human-readable error message, if provided.
    pub message: Option<String>,
    /// Raw response body.
    pub body: String,
}

/// Wire shape of the service's error envelope.
///
/// Older endpoints report `{"error": "..."}`, newer ones follow RFC 7807
/// with `type`/`title`/`detail` and often keep `error` alongside. The body's
/// own `status` is ignored.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl ErrorEnvelope {
    fn into_message(self) -> Option<String> {
        self.message.or(self.detail).or(self.error).or(self.title)
    }
}

impl ApiError {
    /// Build an error from a status and raw body.
    ///
    /// If the body is a JSON error envelope its type and message are
    /// extracted; otherwise only the status and body are kept.
    pub fn from_response(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(mut envelope) => Self {
                status,
                error_type: envelope.error_type.take(),
                message: envelope.into_message(),
                body,
            },
            Err(_) => Self {
                status,
                error_type: None,
                message: None,
                body,
            },
        }
    }

    /// 400 Bad Request.
    pub fn is_bad_request(&self) -> bool {
        self.status == 400
    }

    /// 401 Unauthorized (missing or invalid API key).
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// 404 Not Found.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// 429 Too Many Requests.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Any 4xx status.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Any 5xx status.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(error_type) = &self.error_type {
            write!(f, " ({error_type})")?;
        }
        match &self.message {
            Some(message) => write!(f, ": {message}"),
            None if !self.body.is_empty() => write!(f, ": {}", self.body),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Error enum
// ---------------------------------------------------------------------------

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was obtained: connection failure, timeout or cancellation.
    Transport,
    /// A response (or request body) did not have the expected JSON shape.
    Decode,
    /// The service answered with a non-2xx status.
    Api,
    /// The result poller ran out of attempts before the result completed.
    PollTimeout,
    /// The call was rejected locally before anything was sent.
    InvalidInput,
}

/// Unified error type for all client operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    // -- transport --
    /// Connection or request failure before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The caller's cancellation token fired.
    #[error("Operation cancelled")]
    Cancelled,

    // -- decode --
    /// A 2xx response body did not match the expected type.
    #[error("Invalid JSON: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialize(String),

    /// A batch response did not line up with the batch request.
    #[error("Batch response has {received} entries for {sent} submitted events")]
    BatchLengthMismatch {
        /// Number of events submitted.
        sent: usize,
        /// Number of statuses returned.
        received: usize,
    },

    // -- api --
    /// The service returned a non-2xx response.
    #[error("API error: {0}")]
    Api(ApiError),

    // -- polling --
    /// The query result was still incomplete after every poll attempt.
    #[error("Query timed out: result {id} incomplete after {attempts} attempts")]
    QueryTimedOut {
        /// Query result id.
        id: String,
        /// Number of fetches performed.
        attempts: u32,
        /// The last handle observed before giving up.
        last: Box<QueryResult>,
    },

    // -- local validation --
    /// Filter value does not match the arity of its operator.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// An argument was rejected before sending the request.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Client configuration is incomplete or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) | Error::Timeout(_) | Error::Cancelled => ErrorKind::Transport,
            Error::Decode(_) | Error::Serialize(_) | Error::BatchLengthMismatch { .. } => {
                ErrorKind::Decode
            }
            Error::Api(_) => ErrorKind::Api,
            Error::QueryTimedOut { .. } => ErrorKind::PollTimeout,
            Error::InvalidFilter(_) | Error::InvalidArgument(_) | Error::Config(_) => {
                ErrorKind::InvalidInput
            }
        }
    }

    /// HTTP status of an API error, `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|e| e.status)
    }

    /// The API error detail, if this is an API error.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// True if the operation was abandoned because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// True for the poller's attempt-budget exhaustion.
    pub fn is_query_timeout(&self) -> bool {
        matches!(self, Error::QueryTimedOut { .. })
    }

    /// True for an API error with status 404.
    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_not_found)
    }

    /// True for an API error with status 429.
    pub fn is_rate_limited(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_rate_limited)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
