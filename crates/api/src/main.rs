//! Security Alert Service - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Security Alert Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.environment);

    run_server(config).await?;

    Ok(())
}
