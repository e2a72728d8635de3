use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inventory_api::config::AppConfig;
use inventory_api::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, ADMIN_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!("Starting Inventory API in {:?} mode", config.environment);

    server::run(config, "0.0.0.0").await
}
