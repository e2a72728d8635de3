// server.rs - Startup wiring shared by the binary and the integration tests

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tracing::{error, info, warn};

use crate::auth::{Argon2Hasher, PasswordHasher};
use crate::config::{AppConfig, StoreBackend};
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::routes;
use crate::services::{BootstrapOutcome, BootstrapReconciler};
use crate::state::AppState;

/// Opens the store, reconciles the admin account and assembles the router.
///
/// Bootstrap problems are logged, never returned: the service starts either way.
pub async fn build(config: AppConfig) -> anyhow::Result<Router> {
    let store = open_store(&config).await?;
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::from_config(&config.password_hash));

    let reconciler = BootstrapReconciler::new(Arc::clone(&store), Arc::clone(&hasher));
    log_bootstrap(&reconciler.reconcile(&config.admin).await);

    if config.security.demo {
        warn!("Demo mode enabled; account deletion is refused");
    }

    Ok(routes::app(AppState::new(store, hasher, config)))
}

/// Builds the app and serves it on `host:PORT` until the listener fails.
pub async fn run(config: AppConfig, host: &str) -> anyhow::Result<()> {
    let bind_addr = format!("{host}:{}", config.server.port);
    let app = build(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!("Inventory API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            DatabaseManager::migrate(&pool)
                .await
                .context("failed to apply schema")?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            if !config.is_development() {
                warn!("Using the in-memory store outside development; data will not survive a restart");
            }
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn log_bootstrap(outcome: &BootstrapOutcome) {
    match outcome {
        BootstrapOutcome::Failed(e) => {
            error!(outcome = outcome.label(), error = %e, "Admin bootstrap did not complete; continuing startup")
        }
        BootstrapOutcome::Created { seeding, .. } if !seeding.is_complete() => {
            warn!(
                outcome = outcome.label(),
                failures = seeding.failures.len(),
                "Admin bootstrap finished with incomplete default resources"
            )
        }
        _ => info!(outcome = outcome.label(), "Admin bootstrap finished"),
    }
}
