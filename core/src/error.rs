//! Error types for the posts API client.
//!
//! # Design
//! Every failure reaches the caller as an `ApiError` with a human-readable
//! `Display`. Non-success responses keep their status for callers that want
//! it, but the message is exactly what the server sent (or `HTTP <status>`
//! when the body was empty), so it can be shown to a user as-is.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the posts client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("{0}")]
    Transport(String),

    #[error("login route is not implemented on the back end")]
    LoginNotImplemented,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// HTTP status of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Failures of the persisted key-value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access storage file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {} is not a JSON object: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Invalid client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}
