use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NetworkFailure,
    ServerError,
    ValidationFailure,
    Decode,
}

/// Per-field inline messages keyed by form field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Body the remote service attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("request could not complete: {0}")]
    Network(String),
    #[error("server responded {status}: {message}")]
    Server { status: u16, message: String },
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ConsoleError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConsoleError::Network(_) => ErrorKind::NetworkFailure,
            ConsoleError::Server { .. } => ErrorKind::ServerError,
            ConsoleError::Validation(_) => ErrorKind::ValidationFailure,
            ConsoleError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Text suitable for an alert: the server's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            ConsoleError::Validation(errors) => errors
                .values()
                .cloned()
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
