//! Transport layer for the portal.
//!
//! The portal is served over HTTP only:
//! - `config.rs` - bind address and CORS settings
//! - `http.rs` - axum application assembly and the serve loop
//! - `response.rs` - conversion of service errors into the JSON envelope
//! - `service.rs` - entry point used by the binary
//!
//! The transport owns connection handling; request semantics are delegated
//! to the routing table in `domains::services::router`.

mod config;
mod error;
pub mod http;
pub mod response;
mod service;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
