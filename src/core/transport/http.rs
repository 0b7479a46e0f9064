//! HTTP transport implementation.
//!
//! Serves the portal's JSON API with axum. The routing table itself lives in
//! `domains::services::router`; this module adds the server-level routes
//! (`/`, `/health`), the tower-http layers and the listener lifecycle.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::response::panic_response;
use super::{HttpConfig, TransportError, TransportResult};
use crate::core::PortalServer;
use crate::domains::services::build_router;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Assemble the full application: server routes, API routes and layers.
    pub fn app(&self, server: PortalServer) -> Router {
        let base = Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_check))
            .with_state(server.clone());

        let mut app = base.merge(build_router(server)).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response)),
        );

        // Add CORS if enabled
        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport until a shutdown signal arrives.
    pub async fn run(self, server: PortalServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.app(server);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → API:     /api/...");
        info!("  → Links:   GET /s/{{code}}");
        info!("  → Health:  GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(TransportError::Serve)?;

        Ok(())
    }
}

/// Root handler - provides API info.
async fn root_handler(State(server): State<PortalServer>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": server.name(),
        "version": server.version(),
        "transport": "HTTP",
        "endpoints": {
            "services": "/api/services",
            "health": "/health"
        },
        "documentation": "GET /api/services lists every service and its endpoints"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
