//! Transport service - starts the portal on its configured transport.

use tracing::info;

use super::HttpConfig;
use super::http::HttpTransport;
use crate::core::{PortalServer, Result};

/// Transport service - manages the transport layer for the portal.
pub struct TransportService {
    config: HttpConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Start the transport with the given server.
    ///
    /// This method blocks until the transport is shut down.
    pub async fn run(self, server: PortalServer) -> Result<()> {
        info!("Starting transport: {}", self.config.description());
        HttpTransport::new(self.config).run(server).await?;
        Ok(())
    }
}
