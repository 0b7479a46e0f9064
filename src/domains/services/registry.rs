//! Service Registry - the directory of every portal service.
//!
//! This module provides:
//! - Metadata for each service and its endpoints
//! - The `/api/services` listing built from that metadata

use axum::{Json, response::IntoResponse};
use serde::Serialize;
use serde_json::json;

/// One HTTP endpoint of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// A portal service and its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

const fn endpoint(
    method: &'static str,
    path: &'static str,
    description: &'static str,
) -> EndpointInfo {
    EndpointInfo {
        method,
        path,
        description,
    }
}

// ============================================================================
// Service Registry
// ============================================================================

/// Service registry - the single source of truth for the service listing.
pub struct ServiceRegistry;

impl ServiceRegistry {
    /// Names of all services, in listing order.
    pub fn service_names() -> Vec<&'static str> {
        Self::all_services().iter().map(|s| s.name).collect()
    }

    /// Every service with its endpoints.
    pub fn all_services() -> Vec<ServiceInfo> {
        vec![
            ServiceInfo {
                name: "tasks",
                description: "To-do list with create, read, update and delete.",
                endpoints: vec![
                    endpoint("POST", "/api/tasks", "Create a task"),
                    endpoint("GET", "/api/tasks", "List all tasks"),
                    endpoint("GET", "/api/tasks/{id}", "Get one task"),
                    endpoint("PUT", "/api/tasks/{id}", "Update a task's text or done flag"),
                    endpoint("DELETE", "/api/tasks/{id}", "Delete a task"),
                ],
            },
            ServiceInfo {
                name: "shortener",
                description: "Shortens long URLs and redirects short codes.",
                endpoints: vec![
                    endpoint("POST", "/api/shorten", "Shorten a URL"),
                    endpoint("GET", "/s/{code}", "Redirect to the original URL"),
                ],
            },
            ServiceInfo {
                name: "quotes",
                description: "Quotes of the day. Adding a quote requires Basic auth.",
                endpoints: vec![
                    endpoint("POST", "/api/quotes", "Add a quote (authenticated)"),
                    endpoint("GET", "/api/quotes/random", "Get a random quote"),
                    endpoint("GET", "/api/quotes/{id}", "Get one quote"),
                ],
            },
            ServiceInfo {
                name: "catalog",
                description: "Books and movies, filterable by type, creator, year, genre and title.",
                endpoints: vec![
                    endpoint("POST", "/api/catalog", "Add a book or movie"),
                    endpoint("GET", "/api/catalog", "List items, optionally filtered"),
                    endpoint("GET", "/api/catalog/{id}", "Get one item"),
                ],
            },
            ServiceInfo {
                name: "calculator",
                description: "Adds, subtracts, multiplies and divides two numbers.",
                endpoints: vec![
                    endpoint("GET", "/api/calculate?num1=A&num2=B&operation=OP", "Calculate from query parameters"),
                    endpoint("POST", "/api/calculate", "Calculate from a JSON body"),
                ],
            },
            ServiceInfo {
                name: "random",
                description: "Random integers and passwords.",
                endpoints: vec![
                    endpoint("GET", "/api/random/number?min=A&max=B", "Random integer in [min, max]"),
                    endpoint(
                        "GET",
                        "/api/random/password?length=N&use_symbols=true",
                        "Random password",
                    ),
                ],
            },
            ServiceInfo {
                name: "converter",
                description: "Converts values between units of length, volume and data size.",
                endpoints: vec![
                    endpoint("GET", "/api/converter/units", "List categories and units"),
                    endpoint(
                        "GET",
                        "/api/converter/convert?category=C&from_unit=A&to_unit=B&value=X",
                        "Convert a value",
                    ),
                ],
            },
        ]
    }
}

/// `GET /api/services`
pub async fn list_services() -> impl IntoResponse {
    let services = ServiceRegistry::all_services();
    Json(json!({ "count": services.len(), "services": services }))
}
