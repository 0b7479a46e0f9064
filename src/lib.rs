//! Service Portal Library
//!
//! This crate provides a small multi-service HTTP portal: a to-do list, a URL
//! shortener, quotes, a book and movie catalog, a calculator, a random
//! number and password generator, and a unit converter. All data lives in
//! memory and is lost when the process exits.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Configuration, error handling, shared server state, Basic auth and the HTTP transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **services**: The seven resources, their validation and the routing table
//!   - **store**: Thread-safe in-memory record and link stores
//!
//! # Example
//!
//! ```rust,no_run
//! use service_portal::core::{Config, PortalServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     transport.run(PortalServer::new(config)).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, PortalServer, Result};
