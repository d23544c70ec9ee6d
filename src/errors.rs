use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::NO_RESPONSE_STATUS;

/// Structured validation error raised before a request is sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Shorthand for the common "`field` is required" error.
    pub(crate) fn required(field: &str) -> Self {
        Self::new(format!("{field} is required")).with_field(field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "{}: {}", field, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Broad transport error kinds for classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Request,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Other => "transport",
        };
        write!(f, "{label}")
    }
}

/// How a failed API call ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The server answered with a status outside 2xx.
    Status,
    /// No HTTP response was received.
    Transport(TransportErrorKind),
    /// A 2xx response arrived but its body was not valid JSON.
    MalformedResponse,
}

/// Error returned for every failed call that reached the network layer.
///
/// `status_code` is the HTTP status for [`FailureKind::Status`] and
/// [`NO_RESPONSE_STATUS`] for transport failures and malformed bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct APIError {
    pub status_code: u16,
    pub detail: String,
    pub kind: FailureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Raw response body for debugging (when available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_body: Option<String>,
}

impl APIError {
    pub fn new(status_code: u16, detail: impl Into<String>) -> Self {
        Self {
            status_code,
            detail: detail.into(),
            kind: FailureKind::Status,
            request_id: None,
            raw_body: None,
        }
    }

    pub fn transport(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            status_code: NO_RESPONSE_STATUS,
            detail: detail.into(),
            kind: FailureKind::Transport(kind),
            request_id: None,
            raw_body: None,
        }
    }

    pub fn malformed(detail: impl Into<String>, raw_body: Option<String>) -> Self {
        Self {
            status_code: NO_RESPONSE_STATUS,
            detail: detail.into(),
            kind: FailureKind::MalformedResponse,
            request_id: None,
            raw_body,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// True when no HTTP response was received.
    ///
    /// Malformed success bodies share the sentinel status but are not
    /// transport failures: the server did answer.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, FailureKind::Transport(_))
    }
}

impl fmt::Display for APIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FailureKind::Status => write!(f, "Rini API error {}: {}", self.status_code, self.detail),
            FailureKind::Transport(kind) => write!(f, "{kind} error: {}", self.detail),
            FailureKind::MalformedResponse => write!(f, "malformed response: {}", self.detail),
        }
    }
}

impl std::error::Error for APIError {}

/// Convenience alias for fallible client results.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type surfaced by the client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Api(#[from] APIError),

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("client is closed")]
    Closed,
}

impl Error {
    /// HTTP status (or [`NO_RESPONSE_STATUS`]) for API errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status_code),
            _ => None,
        }
    }

    /// Diagnostic detail for API errors.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Api(err) => Some(err.detail.as_str()),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Api(err) if err.is_transport())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }

    /// True for failures detected before any network call was attempted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::FileNotFound { .. }
                | Error::Io { .. }
                | Error::Serialization(_)
                | Error::Config(_)
                | Error::Closed
        )
    }
}
