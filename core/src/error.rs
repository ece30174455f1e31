//! The pipeline error type.
//!
//! # Design
//! Every transport- or HTTP-level failure surfaces as a single [`ApiError`]
//! carrying a message, an optional HTTP status, and the raw error body when
//! one was received. Callers branch on `status` (408 means timeout, 4xx/5xx
//! map to user-facing messages) or fall back to `message`.
//!
//! This is deliberately distinct from the in-band `error_code` inside a
//! successfully received [`Envelope`](crate::Envelope): an `ApiError` means
//! the exchange itself failed, a non-zero `error_code` means the server
//! processed the request and rejected it at the application level. Callers
//! check both channels.

use thiserror::Error;

/// HTTP status reported for a timed-out request.
pub const TIMEOUT_STATUS: u16 = 408;

/// Unified error raised by the request pipeline.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable description of the failure.
    pub message: String,
    /// HTTP status code, when the failure maps to one.
    pub status: Option<u16>,
    /// Raw error body returned by the server, when one was received.
    pub data: Option<serde_json::Value>,
}

impl ApiError {
    /// Transport-level failure with no HTTP status (connection refused,
    /// DNS failure, serialization failure, ...).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            data: None,
        }
    }

    /// A request that exceeded its configured timeout.
    pub fn timeout() -> Self {
        Self {
            message: "request timed out".to_string(),
            status: Some(TIMEOUT_STATUS),
            data: None,
        }
    }

    /// A non-2xx HTTP response.
    pub fn http(status: u16, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            data: Some(data),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.status == Some(TIMEOUT_STATUS)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::timeout();
        }
        Self {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
            data: None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("failed to encode request body: {err}"))
    }
}
