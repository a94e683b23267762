//! Error types for the Planhub client.
//!
//! Only failures that happen before a response exists live here. Anything the
//! server answered, including 4xx/5xx and malformed bodies, is reported through
//! [`ApiResult`](crate::ApiResult) instead.

use thiserror::Error;

/// Errors that prevent a request from producing a response.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// A configured header value cannot be sent over HTTP
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// The request descriptor is inconsistent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// File not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error while opening an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request body could not be serialized
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Classify a reqwest error, separating "could not reach the server" from
    /// everything else.
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ClientError::ServerUnreachable(e.to_string())
        } else {
            ClientError::Request(e)
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
