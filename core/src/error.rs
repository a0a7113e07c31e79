//! Error types for the engine client.
//!
//! # Design
//! Internally a failed operation is a `Failure`: the transport gave up, the
//! engine answered with a non-2xx status, or a body could not be
//! (de)serialized. `Failure` never crosses the public operation boundary; the
//! normalizer folds it into an `ErrorResponse`, which is what every operation
//! returns on error.

use serde::{Deserialize, Serialize};

use crate::http::HttpResponse;

/// The uniform failure returned by every client operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ErrorResponse {
    /// The HTTP status, or 500 when none was available.
    pub code: u16,

    /// A human-readable message; endpoint-specific where the engine status has
    /// a well known meaning.
    pub message: String,

    /// The engine-supplied error message, if the response carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A failure raised by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The engine could not be reached (connection refused, DNS, socket).
    #[error("failed to connect to the engine: {0}")]
    Connect(String),

    /// The request did not complete in time.
    #[error("request to the engine timed out: {0}")]
    Timeout(String),

    /// The request URL could not be assembled.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// Any other transport-level failure.
    #[error("request to the engine failed: {0}")]
    Request(String),
}

/// Everything that can go wrong during a single operation.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The engine answered with a non-2xx status.
    #[error("engine responded with status {}", .0.status)]
    Status(HttpResponse),

    /// A 2xx body did not match the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Failure {
    /// The HTTP status of the engine response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Failure::Status(response) => Some(response.status),
            _ => None,
        }
    }

    /// Whether the engine was unreachable.
    pub fn is_connect(&self) -> bool {
        matches!(self, Failure::Transport(TransportError::Connect(_)))
    }
}

/// Outcome of operations that return no payload (delete, update).
///
/// `done` is `true` only on confirmed success; `error` is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Done {
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl Done {
    pub fn ok() -> Self {
        Self {
            done: true,
            error: None,
        }
    }

    pub fn failed(error: ErrorResponse) -> Self {
        Self {
            done: false,
            error: Some(error),
        }
    }

    /// Converts into a `Result`, for use with `?`.
    pub fn into_result(self) -> Result<(), ErrorResponse> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl From<Result<(), ErrorResponse>> for Done {
    fn from(result: Result<(), ErrorResponse>) -> Self {
        match result {
            Ok(()) => Done::ok(),
            Err(error) => Done::failed(error),
        }
    }
}
