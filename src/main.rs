//! Todo Service - A small todo REST API
//!
//! CRUD over todo items stored in PostgreSQL, with filtered lists cached in
//! Redis and invalidated on every write.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_service::{
    cache::RedisListCache, create_router, store::PostgresTodoStore, AppState, Config,
};

/// Main entry point for the todo service.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Connect to PostgreSQL and run migrations
/// 4. Create the Redis pool (connects lazily)
/// 5. Start HTTP server on all interfaces
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // RUST_LOG overrides the debug flag
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting todo service");
    info!(
        "Configuration loaded: port={}, debug={}, max_db_connections={}",
        config.server_port, config.debug, config.database_max_connections
    );

    let pool = PostgresTodoStore::connect(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;
    PostgresTodoStore::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;
    info!("Database ready");

    let cache = RedisListCache::new(config.redis_url.as_str())
        .context("failed to configure Redis cache")?;
    info!("Redis cache configured");

    let state = AppState::new(PostgresTodoStore::new(pool), cache);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
