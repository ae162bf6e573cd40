//! # Stockroom API Server
//!
//! ```text
//! .env ──► ApiConfig::load() ──► Database::new(db_config) ──► axum::serve
//!                                                                 │
//!                                        Ctrl+C / SIGTERM ────────┘ drain, close pool
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use stockroom_api::{app, init_tracing, ApiConfig};
use stockroom_db::migrations::migration_status;
use stockroom_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting Stockroom API server...");

    let config = ApiConfig::load().context("Invalid configuration")?;
    info!(
        addr = %config.bind_address(),
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    let db = Database::new(config.db_config())
        .await
        .context("Failed to open database")?;

    let (embedded, applied) = migration_status(db.pool()).await?;
    info!(embedded, applied, "Schema ready");

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!(addr = %config.bind_address(), "Listening");

    axum::serve(listener, app(db.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
