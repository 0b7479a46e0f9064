//! Book and movie catalog.
//!
//! Every item is either a book, which has an author, or a movie, which has
//! a director. The kind and its creator are one tagged value, so an item
//! can never carry both or neither.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Datelike;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::core::PortalServer;
use crate::domains::services::error::{ServiceError, ServiceResult};
use crate::domains::services::extract::{JsonObject, PathSegment};
use crate::domains::services::validation::{
    JsonMap, parse_i64, parse_id, query_param, required_text, text_or_default,
};
use crate::domains::store::{Record, RecordStore};

/// Earliest accepted publication or release year.
pub const MIN_YEAR: i32 = 1800;

/// How far past the current year an item may be dated.
pub const FUTURE_YEARS: i32 = 10;

/// Genre recorded when none is given.
pub const UNSPECIFIED_GENRE: &str = "Unspecified";

// ============================================================================
// Model
// ============================================================================

/// The kind of a catalog item together with its creator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Work {
    Book { author: String },
    Movie { director: String },
}

impl Work {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Book { .. } => "book",
            Self::Movie { .. } => "movie",
        }
    }

    pub fn author(&self) -> Option<&str> {
        match self {
            Self::Book { author } => Some(author),
            Self::Movie { .. } => None,
        }
    }

    pub fn director(&self) -> Option<&str> {
        match self {
            Self::Movie { director } => Some(director),
            Self::Book { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    pub year: i32,
    pub genre: String,
    #[serde(flatten)]
    pub work: Work,
}

impl Record for CatalogItem {
    fn id(&self) -> u64 {
        self.id
    }
}

/// A validated catalog entry, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogItem {
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub work: Work,
}

// ============================================================================
// Validation
// ============================================================================

/// The current calendar year (UTC).
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Validate a new catalog item against the year window ending at
/// `current_year + FUTURE_YEARS`.
///
/// Checks run in order: type, title, year, creator. The creator field of
/// the other kind is ignored.
pub fn validate_new_item(body: &JsonMap, current_year: i32) -> ServiceResult<NewCatalogItem> {
    let kind = body.get("type").and_then(Value::as_str);
    if !matches!(kind, Some("book" | "movie")) {
        return Err(ServiceError::validation(
            "Field 'type' is required and must be either 'book' or 'movie'.",
        ));
    }

    let title = required_text(body, "title", "Field 'title' is required and cannot be empty.")?;
    let year = validate_year(body.get("year"), current_year)?;
    let genre = text_or_default(body, "genre", UNSPECIFIED_GENRE)?;

    let work = if kind == Some("book") {
        Work::Book {
            author: required_text(
                body,
                "author",
                "Items of type 'book' require an author (a non-empty string in 'author').",
            )?,
        }
    } else {
        Work::Movie {
            director: required_text(
                body,
                "director",
                "Items of type 'movie' require a director (a non-empty string in 'director').",
            )?,
        }
    };

    Ok(NewCatalogItem {
        title,
        year,
        genre,
        work,
    })
}

fn validate_year(value: Option<&Value>, current_year: i32) -> ServiceResult<i32> {
    let max_year = current_year + FUTURE_YEARS;
    let out_of_range = |shown: &str| {
        ServiceError::validation(format!(
            "Field 'year' ({shown}) is invalid. Expected a year between {MIN_YEAR} and {max_year}."
        ))
    };

    let value = match value {
        None | Some(Value::Null) => return Err(out_of_range("missing")),
        Some(value) => value,
    };
    let shown = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let year = parse_i64(value).ok_or_else(|| {
        ServiceError::validation(format!("Year value '{shown}' must be an integer."))
    })?;

    i32::try_from(year)
        .ok()
        .filter(|y| (MIN_YEAR..=max_year).contains(y))
        .ok_or_else(|| out_of_range(&shown))
}

// ============================================================================
// Filtering
// ============================================================================

/// Query filters for listing the catalog. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub kind: Option<String>,
    pub author: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub title: Option<String>,
    /// Matches either the author or the director.
    pub creator: Option<String>,
    pub year: Option<i32>,
}

impl CatalogFilter {
    /// Build a filter from query parameters. Empty values are ignored, as is
    /// a `year` that is not an integer.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let lowered = |key: &str| query_param(query, key).map(str::to_lowercase);

        let year = query_param(query, "year").and_then(|raw| match raw.trim().parse::<i32>() {
            Ok(year) => Some(year),
            Err(_) => {
                warn!("Ignoring non-numeric catalog year filter: {}", raw);
                None
            }
        });

        Self {
            kind: query_param(query, "type").map(str::to_string),
            author: lowered("author"),
            director: lowered("director"),
            genre: lowered("genre"),
            title: lowered("title"),
            creator: lowered("creator"),
            year,
        }
    }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        fn contains(haystack: Option<&str>, needle: &Option<String>) -> bool {
            match needle {
                None => true,
                Some(needle) => haystack.is_some_and(|h| h.to_lowercase().contains(needle.as_str())),
            }
        }

        let creator_ok = match &self.creator {
            None => true,
            Some(_) => {
                contains(item.work.author(), &self.creator)
                    || contains(item.work.director(), &self.creator)
            }
        };

        self.kind.as_deref().is_none_or(|kind| kind == item.work.kind())
            && contains(item.work.author(), &self.author)
            && contains(item.work.director(), &self.director)
            && contains(Some(item.genre.as_str()), &self.genre)
            && contains(Some(item.title.as_str()), &self.title)
            && creator_ok
            && self.year.is_none_or(|year| year == item.year)
    }
}

// ============================================================================
// Service
// ============================================================================

fn seed_items() -> Vec<CatalogItem> {
    vec![
        CatalogItem {
            id: 1,
            title: "1984".to_string(),
            year: 1949,
            genre: "Dystopia".to_string(),
            work: Work::Book {
                author: "George Orwell".to_string(),
            },
        },
        CatalogItem {
            id: 2,
            title: "Inception".to_string(),
            year: 2010,
            genre: "Science fiction".to_string(),
            work: Work::Movie {
                director: "Christopher Nolan".to_string(),
            },
        },
        CatalogItem {
            id: 3,
            title: "The Master and Margarita".to_string(),
            year: 1967,
            genre: "Novel".to_string(),
            work: Work::Book {
                author: "Mikhail Bulgakov".to_string(),
            },
        },
    ]
}

pub struct CatalogService {
    store: RecordStore<CatalogItem>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self {
            store: RecordStore::new(),
        }
    }

    /// Catalog pre-loaded with two books and one movie (ids 1 to 3).
    pub fn with_seed() -> Self {
        Self {
            store: RecordStore::seeded(seed_items()),
        }
    }

    pub fn add(&self, item: NewCatalogItem) -> ServiceResult<CatalogItem> {
        let item = self.store.insert_with(|id| CatalogItem {
            id,
            title: item.title,
            year: item.year,
            genre: item.genre,
            work: item.work,
        })?;
        info!("Added {} '{}' to the catalog as {}", item.work.kind(), item.title, item.id);
        Ok(item)
    }

    pub fn list(&self, filter: &CatalogFilter) -> ServiceResult<Vec<CatalogItem>> {
        Ok(self.store.list(|item| filter.matches(item))?)
    }

    pub fn get(&self, id: u64) -> ServiceResult<CatalogItem> {
        self.store.get(id)?.ok_or_else(|| {
            ServiceError::not_found(format!("Catalog item with id {id} was not found."))
        })
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::with_seed()
    }
}

// ============================================================================
// HTTP handlers
// ============================================================================

/// `POST /api/catalog`
#[instrument(skip_all)]
pub async fn add_catalog_item(
    State(server): State<PortalServer>,
    JsonObject(body): JsonObject,
) -> ServiceResult<impl IntoResponse> {
    let item = validate_new_item(&body, current_year())?;
    let item = server.catalog().add(item)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New item added to the catalog.", "item": item })),
    ))
}

/// `GET /api/catalog`
#[instrument(skip(server))]
pub async fn list_catalog(
    State(server): State<PortalServer>,
    Query(query): Query<HashMap<String, String>>,
) -> ServiceResult<impl IntoResponse> {
    let filter = CatalogFilter::from_query(&query);
    Ok(Json(server.catalog().list(&filter)?))
}

/// `GET /api/catalog/{id}`
#[instrument(skip(server))]
pub async fn get_catalog_item(
    State(server): State<PortalServer>,
    PathSegment(raw_id): PathSegment,
) -> ServiceResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "Catalog item")?;
    Ok(Json(server.catalog().get(id)?))
}
