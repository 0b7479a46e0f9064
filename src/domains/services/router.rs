//! Service Router - the portal's routing table.
//!
//! Maps every (method, path) pair to its handler in `definitions/`. Quote
//! creation is the only gated route: the Basic auth check is attached to it
//! with `route_layer`, so it runs before the body is even read.

use axum::{
    Router,
    http::{Method, Uri},
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::core::PortalServer;
use crate::core::security::require_basic_auth;

use super::definitions::{calculator, catalog, converter, quotes, random, shortener, tasks};
use super::error::ServiceError;
use super::registry::list_services;

/// Build the API router with all registered services.
pub fn build_router(server: PortalServer) -> Router {
    let gated_add_quote = post(quotes::add_quote)
        .route_layer(from_fn_with_state(server.clone(), require_basic_auth));

    Router::new()
        .route("/api/services", get(list_services))
        // Tasks
        .route("/api/tasks", post(tasks::create_task).get(tasks::list_tasks))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        // Shortener
        .route("/api/shorten", post(shortener::shorten_url))
        .route("/s/{code}", get(shortener::follow_short_link))
        // Quotes
        .route("/api/quotes", gated_add_quote)
        .route("/api/quotes/random", get(quotes::random_quote))
        .route("/api/quotes/{id}", get(quotes::get_quote))
        // Catalog
        .route(
            "/api/catalog",
            post(catalog::add_catalog_item).get(catalog::list_catalog),
        )
        .route("/api/catalog/{id}", get(catalog::get_catalog_item))
        // Calculator
        .route(
            "/api/calculate",
            get(calculator::calculate_from_query).post(calculator::calculate_from_json),
        )
        // Random
        .route("/api/random/number", get(random::random_number))
        .route("/api/random/password", get(random::random_password))
        // Converter
        .route("/api/converter/units", get(converter::list_units))
        .route("/api/converter/convert", get(converter::convert_units))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(server)
}

async fn route_not_found() -> ServiceError {
    ServiceError::not_found("The requested resource was not found.")
}

async fn method_not_allowed(method: Method, uri: Uri) -> ServiceError {
    ServiceError::method_not_allowed(format!(
        "Method {method} is not allowed for {}.",
        uri.path()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use axum::body::Body;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use http::{HeaderMap, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct Reply {
        status: StatusCode,
        headers: HeaderMap,
        body: Value,
    }

    fn setup() -> (PortalServer, Router) {
        let server = PortalServer::new(Config::default());
        let app = build_router(server.clone());
        (server, app)
    }

    async fn send(app: &Router, req: Request<Body>) -> Reply {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn basic_auth(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    // ------------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_task_lifecycle() {
        let (_, app) = setup();

        let created = send(&app, json_req("POST", "/api/tasks", json!({ "text": " Buy milk " }))).await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body["task"], json!({ "id": 1, "text": "Buy milk", "done": false }));

        let second = send(&app, json_req("POST", "/api/tasks", json!({ "text": "Walk" }))).await;
        assert_eq!(second.body["task"]["id"], 2);

        let listed = send(&app, get_req("/api/tasks")).await;
        assert_eq!(listed.body["count"], 2);

        let updated = send(&app, json_req("PUT", "/api/tasks/1", json!({ "done": true }))).await;
        assert_eq!(updated.status, StatusCode::OK);
        assert_eq!(updated.body["task"]["done"], true);
        assert_eq!(updated.body["task"]["text"], "Buy milk");

        let deleted = send(&app, Request::delete("/api/tasks/1").body(Body::empty()).unwrap()).await;
        assert_eq!(deleted.status, StatusCode::OK);

        let gone = send(&app, get_req("/api/tasks/1")).await;
        assert_eq!(gone.status, StatusCode::NOT_FOUND);
        assert!(gone.body["error"].is_string());
    }

    #[tokio::test]
    async fn test_task_create_rejects_bad_bodies() {
        let (server, app) = setup();

        let blank = send(&app, json_req("POST", "/api/tasks", json!({ "text": "   " }))).await;
        assert_eq!(blank.status, StatusCode::BAD_REQUEST);

        let array = send(&app, json_req("POST", "/api/tasks", json!(["text"]))).await;
        assert_eq!(array.status, StatusCode::BAD_REQUEST);

        let not_json = Request::post("/api/tasks")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("text=hi"))
            .unwrap();
        let not_json = send(&app, not_json).await;
        assert_eq!(not_json.status, StatusCode::BAD_REQUEST);
        assert!(not_json.body["error"].is_string());

        assert!(server.tasks().list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_task_update_edge_cases() {
        let (_, app) = setup();
        send(&app, json_req("POST", "/api/tasks", json!({ "text": "Keep" }))).await;

        let missing = send(&app, json_req("PUT", "/api/tasks/42", json!({ "done": true }))).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let skipped = send(&app, json_req("PUT", "/api/tasks/1", json!({ "done": "yes" }))).await;
        assert_eq!(skipped.status, StatusCode::OK);
        assert_eq!(skipped.body["task"]["done"], false);
        assert_eq!(skipped.body["message"], "No valid fields were provided for the update.");

        let non_numeric = send(&app, get_req("/api/tasks/abc")).await;
        assert_eq!(non_numeric.status, StatusCode::NOT_FOUND);
    }

    // ------------------------------------------------------------------------
    // Shortener
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_shorten_dedup_and_redirect() {
        let (_, app) = setup();
        let shorten = || {
            Request::post("/api/shorten")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::HOST, "portal.test")
                .body(Body::from(json!({ "long_url": "https://example.com/page" }).to_string()))
                .unwrap()
        };

        let first = send(&app, shorten()).await;
        assert_eq!(first.status, StatusCode::CREATED);
        let code = first.body["code"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 6);
        assert_eq!(first.body["short_url"], format!("http://portal.test/s/{code}"));

        let second = send(&app, shorten()).await;
        assert_eq!(second.status, StatusCode::OK);
        assert_eq!(second.body["code"], code.as_str());

        let redirect = send(&app, get_req(&format!("/s/{code}"))).await;
        assert_eq!(redirect.status, StatusCode::FOUND);
        assert_eq!(
            redirect.headers.get(header::LOCATION).unwrap(),
            "https://example.com/page"
        );

        let unknown = send(&app, get_req("/s/zzzzzz")).await;
        assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shorten_rejects_url_unusable_as_location() {
        let (server, app) = setup();
        let resp = send(
            &app,
            json_req("POST", "/api/shorten", json!({ "long_url": "https://example.com/\r\nx" })),
        )
        .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert!(resp.body["error"].as_str().unwrap().contains("control characters"));
        assert!(server.shortener().shorten("https://example.com/ok").unwrap().created);
    }

    #[tokio::test]
    async fn test_shorten_requires_long_url() {
        let (_, app) = setup();
        let resp = send(&app, json_req("POST", "/api/shorten", json!({ "url": "x" }))).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    }

    // ------------------------------------------------------------------------
    // Quotes
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_unauthenticated_quote_is_rejected() {
        let (server, app) = setup();

        let resp = send(&app, json_req("POST", "/api/quotes", json!({ "text": "Sneaky" }))).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        let challenge = resp.headers.get(header::WWW_AUTHENTICATE).unwrap();
        assert!(challenge.to_str().unwrap().starts_with("Basic realm="));
        assert!(resp.body["error"].is_string());

        let mut wrong = json_req("POST", "/api/quotes", json!({ "text": "Sneaky" }));
        wrong.headers_mut().insert(
            header::AUTHORIZATION,
            basic_auth("admin", "guess").parse().unwrap(),
        );
        assert_eq!(send(&app, wrong).await.status, StatusCode::UNAUTHORIZED);

        assert_eq!(server.quotes().count().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_authenticated_quote_is_added() {
        let (server, app) = setup();
        let auth = &server.config().auth;

        let mut req = json_req("POST", "/api/quotes", json!({ "text": "Ship it." }));
        req.headers_mut().insert(
            header::AUTHORIZATION,
            basic_auth(&auth.username, &auth.password).parse().unwrap(),
        );
        let resp = send(&app, req).await;
        assert_eq!(resp.status, StatusCode::CREATED);
        assert_eq!(resp.body["quote"]["id"], 4);
        assert_eq!(resp.body["quote"]["author"], "Anonymous");

        let fetched = send(&app, get_req("/api/quotes/4")).await;
        assert_eq!(fetched.body["text"], "Ship it.");
    }

    #[tokio::test]
    async fn test_quote_reads() {
        let (_, app) = setup();

        let random = send(&app, get_req("/api/quotes/random")).await;
        assert_eq!(random.status, StatusCode::OK);
        assert!(random.body["text"].is_string());

        let first = send(&app, get_req("/api/quotes/1")).await;
        assert_eq!(first.body["author"], "John Lennon");

        let missing = send(&app, get_req("/api/quotes/99")).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    // ------------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_catalog_add_and_filter() {
        let (_, app) = setup();

        let added = send(
            &app,
            json_req(
                "POST",
                "/api/catalog",
                json!({ "type": "movie", "title": "Arrival", "year": 2016, "director": "Denis Villeneuve", "author": "ignored" }),
            ),
        )
        .await;
        assert_eq!(added.status, StatusCode::CREATED);
        assert_eq!(added.body["item"]["id"], 4);
        assert_eq!(added.body["item"]["genre"], "Unspecified");
        assert!(added.body["item"].get("author").is_none());

        let movies = send(&app, get_req("/api/catalog?type=movie")).await;
        assert_eq!(movies.body.as_array().unwrap().len(), 2);

        let by_creator = send(&app, get_req("/api/catalog?creator=orwell")).await;
        assert_eq!(by_creator.body[0]["title"], "1984");

        let bad_year = send(&app, get_req("/api/catalog?year=soon")).await;
        assert_eq!(bad_year.body.as_array().unwrap().len(), 4);

        let item = send(&app, get_req("/api/catalog/2")).await;
        assert_eq!(item.body["director"], "Christopher Nolan");
    }

    #[tokio::test]
    async fn test_catalog_rejects_invalid_items() {
        let (server, app) = setup();

        let resp = send(
            &app,
            json_req(
                "POST",
                "/api/catalog",
                json!({ "type": "book", "title": "Old", "year": 1500, "author": "Someone" }),
            ),
        )
        .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);

        let resp = send(
            &app,
            json_req("POST", "/api/catalog", json!({ "type": "book", "title": "No author", "year": 2000 })),
        )
        .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);

        assert_eq!(server.catalog().list(&Default::default()).unwrap().len(), 3);
    }

    // ------------------------------------------------------------------------
    // Calculator, random, converter
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_calculate_query_and_json() {
        let (_, app) = setup();

        let query = send(&app, get_req("/api/calculate?num1=2&num2=3&operation=add")).await;
        assert_eq!(query.status, StatusCode::OK);
        assert_eq!(query.body["result"], 5.0);
        assert_eq!(query.body["input_data_source"], "query");

        let body = send(
            &app,
            json_req("POST", "/api/calculate", json!({ "num1": 2, "num2": 3, "operation": "+" })),
        )
        .await;
        assert_eq!(body.body["result"], 5.0);
        assert_eq!(body.body["input_data_source"], "json");
        assert_eq!(body.body["operation_requested_alias"], "+");

        let zero = send(&app, get_req("/api/calculate?num1=1&num2=0&operation=divide")).await;
        assert_eq!(zero.status, StatusCode::BAD_REQUEST);

        let missing = send(&app, get_req("/api/calculate?num1=1")).await;
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_random_endpoints() {
        let (_, app) = setup();

        let fixed = send(&app, get_req("/api/random/number?min=5&max=5")).await;
        assert_eq!(fixed.body["random_number"], 5);

        let defaults = send(&app, get_req("/api/random/number")).await;
        assert_eq!(defaults.body["requested_min_bound"], 0);
        assert_eq!(defaults.body["requested_max_bound"], 100);

        let inverted = send(&app, get_req("/api/random/number?min=10&max=1")).await;
        assert_eq!(inverted.status, StatusCode::BAD_REQUEST);

        let password = send(&app, get_req("/api/random/password?length=16&use_symbols=false")).await;
        let text = password.body["password"].as_str().unwrap();
        assert_eq!(text.len(), 16);
        assert!(text.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(password.body["special_symbols_included"], false);

        let too_short = send(&app, get_req("/api/random/password?length=3")).await;
        assert_eq!(too_short.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_converter_endpoints() {
        let (_, app) = setup();

        let units = send(&app, get_req("/api/converter/units")).await;
        assert_eq!(units.body["category_names"]["length"], "Length");
        assert!(units.body["units_by_category"]["length"].is_array());

        let feet = send(
            &app,
            get_req("/api/converter/convert?category=length&from_unit=meter&to_unit=foot&value=1"),
        )
        .await;
        assert_eq!(feet.status, StatusCode::OK);
        let value = feet.body["converted_value"].as_f64().unwrap();
        assert!((value - 3.28084).abs() < 1e-6);

        let incomplete = send(&app, get_req("/api/converter/convert?category=length")).await;
        assert_eq!(incomplete.status, StatusCode::BAD_REQUEST);
    }

    // ------------------------------------------------------------------------
    // Directory and fallback
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_service_directory() {
        let (_, app) = setup();
        let resp = send(&app, get_req("/api/services")).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["count"], 7);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (_, app) = setup();
        let resp = send(&app, get_req("/api/nothing-here")).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert!(resp.body["error"].is_string());
    }

    #[tokio::test]
    async fn test_unsupported_method_is_json_405() {
        let (server, app) = setup();

        for (method, uri) in [
            ("PATCH", "/api/tasks/1"),
            ("GET", "/api/quotes"),
            ("DELETE", "/api/catalog/1"),
        ] {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let resp = send(&app, req).await;
            assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
            assert!(resp.body["error"].as_str().unwrap().contains(method));
        }
        assert_eq!(server.quotes().count().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_undecodable_path_segment_is_json_404() {
        let (_, app) = setup();

        for uri in ["/api/tasks/%FF", "/api/quotes/%FF", "/api/catalog/%FF", "/s/%FF"] {
            let resp = send(&app, get_req(uri)).await;
            assert_eq!(resp.status, StatusCode::NOT_FOUND, "{uri}");
            assert!(resp.body["error"].is_string());
        }

        let delete = Request::delete("/api/tasks/%FF").body(Body::empty()).unwrap();
        assert_eq!(send(&app, delete).await.status, StatusCode::NOT_FOUND);
    }
}
