//! Error types for the job-board API client.
//!
//! # Design
//! Every failure a gateway call can produce is one `ApiError`. HTTP errors
//! keep the status and, when the server answered with JSON, the parsed body,
//! so callers can read fields such as `detail` without parsing again.
//! Transports report their own failures as `TransportError`; the gateway
//! turns those into `ApiError::Network` or `ApiError::Transport`.

use serde_json::Value;
use thiserror::Error;

/// User-facing message for a backend that cannot be reached.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: Could not connect to the server. Please check if the backend is running.";

/// Errors returned by the gateway and the typed client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL is missing or unusable. Raised before any I/O.
    #[error("API base URL is not configured: {0}")]
    Config(String),

    /// The server answered with a non-2xx status.
    ///
    /// `message` is the JSON-serialized error body when it parsed as JSON,
    /// otherwise the raw response text (or a generic message if empty).
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        data: Option<Value>,
    },

    /// The backend could not be reached at all.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network,

    /// Any other transport failure, message passed through unchanged.
    #[error("{0}")]
    Transport(String),

    /// A request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A response did not match the expected typed contract.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// HTTP status, when the error came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed JSON error body, when the server sent one.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiError::Http { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    /// The `detail` string of a Django-REST style error body.
    pub fn detail(&self) -> Option<&str> {
        self.data()?.get("detail")?.as_str()
    }
}

/// Broad classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, timeout and the like.
    Unreachable,
    Other,
}

/// Failure reported by a `Transport` before any response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Unreachable,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Other,
            message: message.into(),
        }
    }
}
