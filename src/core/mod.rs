//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the portal,
//! including error handling, configuration, the shared server state,
//! request authentication and the HTTP transport.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{BasicCredentials, check_credentials};
pub use server::PortalServer;
pub use transport::{HttpConfig, TransportService};
