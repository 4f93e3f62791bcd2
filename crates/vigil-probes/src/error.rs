//! Probe error types.

use thiserror::Error;

/// Errors that can occur while exercising an external dependency.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a service response.
    #[error("parse error: {0}")]
    Parse(String),

    /// WebSocket handshake or transport error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Redis connection or command error.
    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Object storage error.
    #[error("storage error: {0}")]
    Storage(#[from] object_store::Error),

    /// A probe step needs configuration that is absent.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}
