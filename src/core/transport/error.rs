//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can stop the HTTP listener.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listener could not be bound, usually because the port is taken.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The serve loop exited with an error after the listener was bound.
    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }
}
