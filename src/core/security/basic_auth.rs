//! HTTP Basic authentication for gated routes.
//!
//! The credential check is a pure function over request headers so it can be
//! tested without a server. [`require_basic_auth`] wraps it as axum
//! middleware; it is installed with `route_layer` on individual routes, so a
//! rejected request never reaches the handler.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

use crate::core::PortalServer;
use crate::core::config::AuthConfig;
use crate::domains::services::ServiceError;

/// Username and password carried by a Basic `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Parse `Basic <base64(username:password)>`.
    ///
    /// Returns `None` for any other scheme, undecodable base64, non-UTF-8
    /// content or a payload without a `:`.
    pub fn parse(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Extract credentials from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse)
    }
}

/// Check request headers against the configured credentials.
pub fn check_credentials(headers: &HeaderMap, auth: &AuthConfig) -> Result<(), ServiceError> {
    match BasicCredentials::from_headers(headers) {
        Some(creds) if creds.username == auth.username && creds.password == auth.password => {
            debug!("Authenticated request from user {}", creds.username);
            Ok(())
        }
        Some(creds) => {
            warn!("Rejected credentials for user {}", creds.username);
            Err(ServiceError::unauthorized(auth.realm.clone()))
        }
        None => Err(ServiceError::unauthorized(auth.realm.clone())),
    }
}

/// Middleware that rejects requests without valid Basic credentials.
pub async fn require_basic_auth(
    State(server): State<PortalServer>,
    req: Request,
    next: Next,
) -> Response {
    match check_credentials(req.headers(), &server.config().auth) {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}
