//! # stockroom-db: Database Layer for Stockroom
//!
//! This crate provides database access for the Stockroom backend.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /sales/)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌───────────┐  ┌─────────┐ │   │
//! │  │  │  Database  │  │ Repositories │  │ Inventory │  │ Gateway │ │   │
//! │  │  │  (pool.rs) │  │ users        │  │ record    │  │ execute │ │   │
//! │  │  │            │◄─│ products     │  │   sale    │─►│ fetch_* │ │   │
//! │  │  │ SqlitePool │  │ stocks       │  │ remove    │  │ binding │ │   │
//! │  │  │            │  │ sales        │  │ delete    │  │         │ │   │
//! │  │  └────────────┘  └──────────────┘  └───────────┘  └─────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (stockroom.db)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`gateway`] - Parameterized statement execution
//! - [`migrations`] - Embedded schema bootstrap
//! - [`error`] - Database and workflow error types
//! - [`repository`] - Single-table reads and inserts
//! - [`inventory`] - Transactional stock workflows
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockroom.db")).await?;
//!
//! let receipt = db.inventory().record_sale(product_id, 3, user_id).await?;
//! let lots = db.stocks().list_expiring(user_id, 7).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gateway;
pub mod inventory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, InventoryError, InventoryResult};
pub use gateway::{Outcome, Row, SqlParam};
pub use inventory::InventoryService;
pub use pool::{Database, DbConfig};

pub use repository::{ProductRepository, SaleRepository, StockRepository, UserRepository};

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use stockroom_core::{NewProduct, NewStock, ProductId, StockId, UserId};

    use crate::{gateway, Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// A file-backed database under the temp dir, for multi-connection tests.
    ///
    /// Returns the path so the caller can remove it afterwards.
    pub async fn file_db(tag: &str, max_connections: u32) -> (Database, PathBuf) {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "stockroom-{}-{}-{}.db",
            tag,
            std::process::id(),
            nanos
        ));

        let db = Database::new(DbConfig::new(&path).max_connections(max_connections))
            .await
            .unwrap();
        (db, path)
    }

    pub async fn remove_file_db(db: Database, path: PathBuf) {
        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Units on hand across every lot of a product.
    pub async fn units_on_hand(db: &Database, product_id: ProductId) -> i64 {
        gateway::fetch_scalar(
            db.pool(),
            "SELECT COALESCE(SUM(stock_quantity), 0) FROM stocks WHERE product_id = ?",
            &[product_id.into()],
        )
        .await
        .unwrap()
    }

    pub async fn seed_user(db: &Database, email: &str) -> UserId {
        db.users().create("tester", email, "hash").await.unwrap()
    }

    pub async fn seed_product(db: &Database, user_id: UserId, name: &str) -> ProductId {
        db.products()
            .create(&NewProduct {
                product_name: name.to_string(),
                category: "Grocery".to_string(),
                price_cents: 199,
                user_id,
            })
            .await
            .unwrap()
    }

    pub async fn seed_stock(
        db: &Database,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
        expiry_date: NaiveDate,
    ) -> StockId {
        db.stocks()
            .create(&NewStock {
                product_id,
                stock_quantity: quantity,
                expiry_date,
                user_id,
            })
            .await
            .unwrap()
    }
}
