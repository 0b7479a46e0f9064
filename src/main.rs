//! Service Portal Entry Point
//!
//! This is the main entry point for the portal. It initializes logging,
//! loads configuration, and serves the API over HTTP.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use service_portal::core::{Config, PortalServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!("Quote submission auth: {:?}", config.auth);

    let transport = TransportService::new(config.transport.clone());
    let server = PortalServer::new(config);

    info!("Server initialized");

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` directives are honoured; the configured level is added on top.
/// An unrecognised level falls back to `info`.
fn init_logging(level: &str) {
    let level = level.trim().parse::<Level>().unwrap_or(Level::INFO);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
