//! Stats Service
//!
//! Entry point: loads configuration, sets up logging, builds the document
//! store and serves the ADP and scoring endpoints until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use tracing::info;

use stats_service::{initialize_logging, load_config, shutdown_signal, StatsService};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    let config = load_config().context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    info!("Starting Stats Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Store backend: {:?}, max concurrent tasks: {}",
        config.store.backend, config.pipeline.max_concurrent_tasks
    );

    let service = StatsService::new(config)?;
    service.run(shutdown_signal()).await?;

    info!("Stats Service shutdown complete");
    Ok(())
}
