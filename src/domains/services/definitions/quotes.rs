//! Quote of the day service.
//!
//! Quotes are readable by anyone. Adding a quote is gated by the Basic auth
//! route layer installed in the router; the handler itself never sees an
//! unauthenticated request.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use rand::seq::SliceRandom;
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::core::PortalServer;
use crate::domains::services::error::{ServiceError, ServiceResult};
use crate::domains::services::extract::{JsonObject, PathSegment};
use crate::domains::services::validation::{JsonMap, parse_id, required_text, text_or_default};
use crate::domains::store::{Record, RecordStore};

/// Author recorded when none is given.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub id: u64,
    pub text: String,
    pub author: String,
}

impl Record for Quote {
    fn id(&self) -> u64 {
        self.id
    }
}

/// A validated quote, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuote {
    pub text: String,
    pub author: String,
}

pub fn validate_new_quote(body: &JsonMap) -> ServiceResult<NewQuote> {
    let text = required_text(
        body,
        "text",
        "Field 'text' is required for a quote and cannot be empty.",
    )?;
    let author = text_or_default(body, "author", ANONYMOUS_AUTHOR)?;

    Ok(NewQuote { text, author })
}

fn seed_quotes() -> Vec<Quote> {
    [
        (
            "Life is what happens to you while you're busy making other plans.",
            "John Lennon",
        ),
        (
            "The only way to do great work is to love what you do.",
            "Steve Jobs",
        ),
        (
            "To reach a goal, you must first start walking.",
            "Honoré de Balzac",
        ),
    ]
    .into_iter()
    .zip(1..)
    .map(|((text, author), id)| Quote {
        id,
        text: text.to_string(),
        author: author.to_string(),
    })
    .collect()
}

pub struct QuoteService {
    store: RecordStore<Quote>,
}

impl QuoteService {
    /// Empty collection.
    pub fn new() -> Self {
        Self {
            store: RecordStore::new(),
        }
    }

    /// Collection pre-loaded with the built-in quotes (ids 1 to 3).
    pub fn with_seed() -> Self {
        Self {
            store: RecordStore::seeded(seed_quotes()),
        }
    }

    pub fn add(&self, quote: NewQuote) -> ServiceResult<Quote> {
        let quote = self.store.insert_with(|id| Quote {
            id,
            text: quote.text,
            author: quote.author,
        })?;
        info!("Added quote {} by {}", quote.id, quote.author);
        Ok(quote)
    }

    /// A uniformly chosen quote.
    pub fn random(&self) -> ServiceResult<Quote> {
        self.store
            .list(|_| true)?
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| ServiceError::not_found("There are no quotes available right now."))
    }

    pub fn get(&self, id: u64) -> ServiceResult<Quote> {
        self.store.get(id)?.ok_or_else(|| {
            ServiceError::not_found(format!("Quote with id {id} was not found in the collection."))
        })
    }

    pub fn count(&self) -> ServiceResult<usize> {
        Ok(self.store.len()?)
    }
}

impl Default for QuoteService {
    fn default() -> Self {
        Self::with_seed()
    }
}

/// `POST /api/quotes` (authenticated)
#[instrument(skip_all)]
pub async fn add_quote(
    State(server): State<PortalServer>,
    JsonObject(body): JsonObject,
) -> ServiceResult<impl IntoResponse> {
    let quote = validate_new_quote(&body)?;
    let quote = server.quotes().add(quote)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Quote added to the collection.", "quote": quote })),
    ))
}

/// `GET /api/quotes/random`
#[instrument(skip_all)]
pub async fn random_quote(State(server): State<PortalServer>) -> ServiceResult<impl IntoResponse> {
    Ok(Json(server.quotes().random()?))
}

/// `GET /api/quotes/{id}`
#[instrument(skip(server))]
pub async fn get_quote(
    State(server): State<PortalServer>,
    PathSegment(raw_id): PathSegment,
) -> ServiceResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "Quote")?;
    Ok(Json(server.quotes().get(id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn body(value: Value) -> JsonMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_seeded_quotes() {
        let service = QuoteService::with_seed();
        assert_eq!(service.count().unwrap(), 3);
        assert_eq!(service.get(1).unwrap().author, "John Lennon");

        let added = service
            .add(NewQuote {
                text: "Stay hungry.".to_string(),
                author: "Steve Jobs".to_string(),
            })
            .unwrap();
        assert_eq!(added.id, 4);
    }

    #[test]
    fn test_author_defaults_to_anonymous() {
        let quote = validate_new_quote(&body(json!({ "text": " Be kind. ", "author": "  " }))).unwrap();
        assert_eq!(quote.text, "Be kind.");
        assert_eq!(quote.author, ANONYMOUS_AUTHOR);

        let quote = validate_new_quote(&body(json!({ "text": "Be kind." }))).unwrap();
        assert_eq!(quote.author, ANONYMOUS_AUTHOR);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(validate_new_quote(&body(json!({ "text": "" }))).is_err());
        assert!(validate_new_quote(&body(json!({ "author": "Nobody" }))).is_err());
        assert!(validate_new_quote(&body(json!({ "text": "x", "author": 3 }))).is_err());
    }

    #[test]
    fn test_random_quote() {
        let service = QuoteService::with_seed();
        let quote = service.random().unwrap();
        assert!((1..=3).contains(&quote.id));

        let empty = QuoteService::new();
        assert_eq!(empty.random().unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_unknown_quote() {
        let service = QuoteService::with_seed();
        assert_eq!(service.get(99).unwrap_err().status_code(), 404);
    }
}
