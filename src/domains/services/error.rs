//! Service-specific error types.

use thiserror::Error;

use crate::domains::store::StoreError;

/// Errors that can occur while serving a portal request.
///
/// Every variant maps to exactly one HTTP status; the conversion to a
/// response lives in `core::transport::response`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed, missing or out-of-range input.
    #[error("{0}")]
    Validation(String),

    /// Unknown id, code or route.
    #[error("{0}")]
    NotFound(String),

    /// Known route, unsupported HTTP method.
    #[error("{0}")]
    MethodNotAllowed(String),

    /// Missing or incorrect credentials for a gated operation.
    #[error("Authentication required")]
    Unauthorized {
        /// Realm announced in the `WWW-Authenticate` challenge.
        realm: String,
    },

    /// A fault that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new "method not allowed" error.
    pub fn method_not_allowed(msg: impl Into<String>) -> Self {
        Self::MethodNotAllowed(msg.into())
    }

    /// Create a new authentication challenge.
    pub fn unauthorized(realm: impl Into<String>) -> Self {
        Self::Unauthorized {
            realm: realm.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized { .. } => 401,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed(_) => 405,
            Self::Internal(_) => 500,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
