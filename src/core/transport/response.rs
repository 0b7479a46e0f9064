//! Error envelope for HTTP responses.
//!
//! Every failure leaves the portal as `{"error": message}` with the status
//! code of its [`ServiceError`] variant. Authentication failures also carry
//! a `WWW-Authenticate` challenge.

use std::any::Any;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use serde_json::json;
use tracing::{error, warn};

use crate::domains::services::ServiceError;

/// Build the uniform JSON error body.
pub fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self {
            ServiceError::Internal(msg) => {
                error!("Internal error: {}", msg);
                // Internal details stay in the log.
                error_body(status, "Internal server error. Please try again later.")
            }
            ServiceError::Unauthorized { realm } => {
                warn!("Rejected unauthenticated request");
                let mut resp = error_body(status, self.to_string());
                let challenge = format!("Basic realm=\"{}\"", realm.replace('"', "'"));
                let value = HeaderValue::from_str(&challenge)
                    .unwrap_or_else(|_| HeaderValue::from_static("Basic realm=\"portal\""));
                resp.headers_mut().insert(header::WWW_AUTHENTICATE, value);
                resp
            }
            ServiceError::Validation(_)
            | ServiceError::NotFound(_)
            | ServiceError::MethodNotAllowed(_) => {
                error_body(status, self.to_string())
            }
        }
    }
}

/// Response for a handler that panicked.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("Handler panicked: {}", detail);
    error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error. Please try again later.",
    )
}
