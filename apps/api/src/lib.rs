//! # stockroom-api: HTTP Surface for Stockroom
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Client ──► TcpListener ──► CorsLayer ──► TraceLayer ──► Router        │
//! │                                                            │            │
//! │                        ┌───────────────┬──────────────┬────┴─────┐      │
//! │                        ▼               ▼              ▼          ▼      │
//! │                    accounts        products        stocks      sales    │
//! │                        │               │              │          │      │
//! │                        └───────────────┴──────┬───────┴──────────┘      │
//! │                                               ▼                         │
//! │                                  AppState { db: Database }              │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                          stockroom-db ──► SQLite (one pool)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary in `main.rs` only loads configuration, opens the database and
//! serves [`router`]; tests drive the same router in-process.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use stockroom_db::Database;
use tracing_subscriber::EnvFilter;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use routes::router;

/// Shared application state, held behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Arc<Self> {
        Arc::new(AppState { db })
    }
}

/// Builds the full application from an open database.
pub fn app(db: Database) -> Router {
    router(AppState::new(db))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom_db=trace` - Show trace for one crate only
/// - Default: `info,stockroom=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
