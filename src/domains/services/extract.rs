//! Request extractors shared by the portal handlers.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde_json::Value;
use tracing::warn;

use super::error::ServiceError;
use super::validation::JsonMap;

/// A request body that must be a JSON object.
///
/// Rejections use the portal's error envelope instead of axum's plain-text
/// defaults: a missing content type, malformed JSON and non-object JSON all
/// become a 400 validation error.
#[derive(Debug, Clone)]
pub struct JsonObject(pub JsonMap);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!("Rejected request body: {}", rejection.body_text());
                ServiceError::validation("Invalid request format: a JSON body is expected.")
            })?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ServiceError::validation(
                "Invalid request format: the JSON body must be an object.",
            )),
        }
    }
}

/// The single dynamic segment of a route such as `/api/tasks/{id}`.
///
/// A segment that cannot be decoded (for instance invalid UTF-8 after
/// percent-decoding) cannot name any stored resource, so it is reported as a
/// 404 in the portal's error envelope.
#[derive(Debug, Clone)]
pub struct PathSegment(pub String);

impl<S> FromRequestParts<S> for PathSegment
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                warn!("Rejected path segment: {}", rejection.body_text());
                ServiceError::not_found("The requested resource was not found.")
            })?;
        Ok(Self(segment))
    }
}
