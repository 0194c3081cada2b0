//! Normalized error shapes for document store calls.

use serde::Deserialize;
use std::time::Duration;

/// Error envelope the store attaches to failed responses.
///
/// Handlers are inconsistent about the field name, so both `error` and
/// `message` are recognized; `details` is carried through opaquely.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// Outcome classification for a gateway call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected before any network I/O happened
    #[error("{0}")]
    Validation(String),

    /// Transport-level failure (connect, DNS, reset, decode)
    #[error("network error: {0}")]
    Network(String),

    /// The per-operation deadline expired and the call was aborted
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The store answered with a non-success status
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },
}

impl ApiError {
    /// HTTP status associated with this error; deadline expiry is modeled
    /// as 408 to match the wire contract.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Timeout(_) => Some(408),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a read-path retry may re-attempt after this error.
    ///
    /// Transport failures and 5xx are transient; 4xx means the request
    /// itself is wrong and will not get better, with 408 as the one
    /// timeout sentinel that stays retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => true,
            ApiError::Server { status, .. } => *status >= 500 || *status == 408,
            ApiError::Validation(_) => false,
        }
    }

    /// Map a transport error, distinguishing deadline expiry
    pub(crate) fn from_reqwest(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(deadline)
        } else {
            ApiError::Network(err.to_string())
        }
    }

    /// Normalize a non-success response body into a `Server` error.
    ///
    /// A recognized JSON envelope wins; otherwise fall back to the HTTP
    /// status canonical reason, and as a last resort the bare code.
    pub fn from_error_body(status: u16, reason: Option<&str>, body: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
        let (message, details) = match parsed {
            Some(envelope) => {
                let message = envelope
                    .error
                    .or(envelope.message)
                    .filter(|m| !m.is_empty());
                (message, envelope.details)
            }
            None => (None, None),
        };

        let message = message.unwrap_or_else(|| {
            reason
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status))
        });

        ApiError::Server {
            status,
            message,
            details,
        }
    }
}
