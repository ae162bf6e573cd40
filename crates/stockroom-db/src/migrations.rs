//! # Database Migrations
//!
//! Embedded schema bootstrap for Stockroom.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database::new()                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (created on first run)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  001_initial_schema.sql  ✓ applied once, recorded with its checksum    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Server continues startup                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! New schema changes go in a new `migrations/sqlite/NNN_description.sql`
//! file. Existing files are never edited: their checksums are recorded.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use crate::gateway;

/// Migrations embedded from `migrations/sqlite` at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations in filename order. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: Option<i64> = gateway::fetch_optional_scalar(
        pool,
        "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
        &[],
    )
    .await?;

    Ok((total, applied.unwrap_or(0) as usize))
}
