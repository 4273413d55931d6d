//! Accounting Service - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # PostgreSQL storage (default)
//! APP_DATABASE_URL=postgres://... cargo run --bin accounting-api
//!
//! # In-process storage, nothing persisted
//! APP_STORAGE=memory cargo run --bin accounting-api
//! ```
//!
//! # Environment Variables
//!
//! * `APP_HOST` - Server host (default: 0.0.0.0)
//! * `APP_PORT` - Server port (default: 8080)
//! * `APP_DATABASE_URL` - PostgreSQL connection string
//! * `APP_STORAGE` - `postgres` or `memory` (default: postgres)
//! * `APP_LOG_LEVEL` - Log filter when `RUST_LOG` is unset (default: info)
//! * `APP_MAX_CONNECTIONS` - Pool size (default: 10)

use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_db::{create_pool, run_migrations, DatabaseConfig};
use interface_api::config::{AppConfig, StorageBackend};
use interface_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid APP_* configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Starting Accounting Service API Server"
    );

    let state = match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(
                DatabaseConfig::new(config.database_url.clone())
                    .max_connections(config.max_connections),
            )
            .await
            .context("could not connect to the database")?;
            run_migrations(&pool).await.context("migrations failed")?;
            AppState::postgres(pool, config.clone())
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(config.clone())
        }
    };

    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
