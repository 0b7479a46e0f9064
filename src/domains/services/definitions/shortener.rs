//! URL shortener service.
//!
//! Long URLs are mapped to short random alphanumeric codes. Shortening the
//! same URL again returns the code it already has.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use rand::{Rng, distributions::Alphanumeric};
use serde_json::json;
use tracing::{error, info, instrument};

use crate::core::PortalServer;
use crate::core::config::ShortenerConfig;
use crate::domains::services::error::{ServiceError, ServiceResult};
use crate::domains::services::extract::{JsonObject, PathSegment};
use crate::domains::services::validation::JsonMap;
use crate::domains::store::{LinkInsert, LinkStore};

/// Result of a shorten request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub code: String,
    /// `false` when the URL had been shortened before.
    pub created: bool,
}

/// Validate a shorten request body, returning the URL to shorten.
///
/// The URL is stored verbatim. It must be usable as a `Location` header
/// later, so control characters are rejected.
pub fn validate_long_url(body: &JsonMap) -> ServiceResult<String> {
    match body.get("long_url").and_then(|v| v.as_str()) {
        Some(url) if url.chars().any(char::is_control) => Err(ServiceError::validation(
            "Field 'long_url' must not contain control characters.",
        )),
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        _ => Err(ServiceError::validation(
            "Field 'long_url' is required and must be a non-empty string.",
        )),
    }
}

/// Generate a random code of `length` ASCII letters and digits.
pub fn random_code(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Shortener backed by an in-memory link table.
pub struct ShortenerService {
    links: LinkStore,
    code_length: usize,
    max_attempts: usize,
}

impl ShortenerService {
    pub fn new(config: &ShortenerConfig) -> Self {
        Self {
            links: LinkStore::new(),
            code_length: config.code_length,
            max_attempts: config.max_attempts,
        }
    }

    /// Shorten `long_url`, reusing its existing code if there is one.
    pub fn shorten(&self, long_url: &str) -> ServiceResult<Shortened> {
        self.shorten_with(long_url, || random_code(self.code_length))
    }

    fn shorten_with(
        &self,
        long_url: &str,
        generate: impl FnMut() -> String,
    ) -> ServiceResult<Shortened> {
        match self
            .links
            .insert_unique(long_url, generate, self.max_attempts)?
        {
            LinkInsert::Existing(code) => Ok(Shortened {
                code,
                created: false,
            }),
            LinkInsert::Created(code) => {
                info!("Shortened {} to code {}", long_url, code);
                Ok(Shortened {
                    code,
                    created: true,
                })
            }
            LinkInsert::Exhausted => {
                error!(
                    "Could not generate a unique short code after {} attempts",
                    self.max_attempts + 1
                );
                Err(ServiceError::internal(
                    "could not generate a unique short code",
                ))
            }
        }
    }

    /// Target URL for `code`.
    pub fn resolve(&self, code: &str) -> ServiceResult<String> {
        self.links.resolve(code)?.ok_or_else(|| {
            ServiceError::not_found(format!(
                "Short link with code \"{code}\" was not found or has expired."
            ))
        })
    }
}

/// Base URL used when building `short_url` values.
fn public_base(server: &PortalServer, headers: &HeaderMap) -> String {
    if let Some(base) = &server.config().shortener.public_base_url {
        return base.clone();
    }

    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{host}"),
        None => format!("http://{}", server.config().transport.address()),
    }
}

/// `POST /api/shorten`
#[instrument(skip_all)]
pub async fn shorten_url(
    State(server): State<PortalServer>,
    headers: HeaderMap,
    JsonObject(body): JsonObject,
) -> ServiceResult<impl IntoResponse> {
    let long_url = validate_long_url(&body)?;
    let shortened = server.shortener().shorten(&long_url)?;

    let (status, message) = if shortened.created {
        (StatusCode::CREATED, "URL shortened successfully!")
    } else {
        (StatusCode::OK, "This URL has already been shortened.")
    };
    let short_url = format!("{}/s/{}", public_base(&server, &headers), shortened.code);

    Ok((
        status,
        Json(json!({
            "message": message,
            "code": shortened.code,
            "short_url": short_url,
            "original_url": long_url,
        })),
    ))
}

/// `GET /s/{code}`
#[instrument(skip(server))]
pub async fn follow_short_link(
    State(server): State<PortalServer>,
    PathSegment(code): PathSegment,
) -> ServiceResult<Response> {
    let target = server.shortener().resolve(&code)?;
    let location = HeaderValue::from_bytes(target.as_bytes()).map_err(|_| {
        ServiceError::internal(format!("stored target for code {code} is not a valid header"))
    })?;

    info!("Redirecting {} to {}", code, target);
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn service() -> ShortenerService {
        ShortenerService::new(&ShortenerConfig::default())
    }

    fn body(value: Value) -> JsonMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_random_code_shape() {
        let code = random_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_validate_long_url() {
        assert_eq!(
            validate_long_url(&body(json!({ "long_url": "https://example.com" }))).unwrap(),
            "https://example.com"
        );
        assert!(validate_long_url(&body(json!({ "long_url": "" }))).is_err());
        assert!(validate_long_url(&body(json!({ "long_url": 42 }))).is_err());
        assert!(validate_long_url(&body(json!({}))).is_err());

        let err = validate_long_url(&body(json!({ "long_url": "https://example.com/\nSet-Cookie: x" })))
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(validate_long_url(&body(json!({ "long_url": "https://example.com/\u{7f}" }))).is_err());
    }

    #[test]
    fn test_same_url_gets_same_code() {
        let service = service();
        let first = service.shorten("https://example.com/a").unwrap();
        let second = service.shorten("https://example.com/a").unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.code, second.code);
    }

    #[test]
    fn test_resolve() {
        let service = service();
        let link = service.shorten("https://example.com/b").unwrap();

        assert_eq!(service.resolve(&link.code).unwrap(), "https://example.com/b");
        assert_eq!(service.resolve("nope00").unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_collisions_exhaust_to_internal_error() {
        let service = service();
        service
            .shorten_with("https://example.com/1", || "AAAAAA".to_string())
            .unwrap();

        let err = service
            .shorten_with("https://example.com/2", || "AAAAAA".to_string())
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(service.resolve("AAAAAA").is_ok());
    }
}
