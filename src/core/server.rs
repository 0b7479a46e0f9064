//! Portal server state and lifecycle.
//!
//! [`PortalServer`] owns the configuration and one instance of every
//! resource service. It is cheap to clone and is handed to every axum
//! handler as router state, so no service lives in a global.

use std::sync::Arc;

use tracing::info;

use super::config::Config;
use crate::domains::services::definitions::{
    CatalogService, Converter, QuoteService, RandomGenerator, ShortenerService, TaskService,
};

/// The portal's shared application state.
#[derive(Clone)]
pub struct PortalServer {
    /// Server configuration.
    config: Arc<Config>,

    tasks: Arc<TaskService>,
    shortener: Arc<ShortenerService>,
    quotes: Arc<QuoteService>,
    catalog: Arc<CatalogService>,
    random: Arc<RandomGenerator>,
    converter: Arc<Converter>,
}

impl PortalServer {
    /// Create a new server with the given configuration.
    ///
    /// Quotes and the catalog start with their built-in entries; tasks and
    /// short links start empty.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        let server = Self {
            tasks: Arc::new(TaskService::new()),
            shortener: Arc::new(ShortenerService::new(&config.shortener)),
            quotes: Arc::new(QuoteService::with_seed()),
            catalog: Arc::new(CatalogService::with_seed()),
            random: Arc::new(RandomGenerator::new(config.limits.clone())),
            converter: Arc::new(Converter::new()),
            config,
        };

        info!("Portal services initialized");
        server
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // Services
    // ========================================================================

    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    pub fn shortener(&self) -> &ShortenerService {
        &self.shortener
    }

    pub fn quotes(&self) -> &QuoteService {
        &self.quotes
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn random(&self) -> &RandomGenerator {
        &self.random
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }
}
