//! Error type for the portal binary.
//!
//! Request-level failures never leave the router: they are turned into JSON
//! responses there. What remains are the failures that stop the process.

use thiserror::Error;

/// A specialized Result type for portal operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop the portal.
#[derive(Debug, Error)]
pub enum Error {
    /// Error starting or running the HTTP transport.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}
