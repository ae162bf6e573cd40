//! # Stock Repository
//!
//! Stock lots: adding them, listing them, and the expiring-stock query.
//!
//! ## Expiring Stock
//! ```text
//! today = 2026-10-17, within_days = 7  →  threshold = 2026-10-24
//!
//!   #4  Yogurt   exp 2026-10-12   ✓ (already expired, still listed)
//!   #2  Milk     exp 2026-10-24   ✓ (on the threshold)
//!   #9  Cheese   exp 2026-10-25   ✗
//! ```
//!
//! Decrements and deletions of lots happen in [`crate::inventory`].

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbResult, InventoryResult};
use crate::gateway::{self, SqlParam};
use stockroom_core::inventory::expiry_threshold;
use stockroom_core::{NewStock, StockId, StockView, UserId};

/// Repository for stock lots.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Inserts a stock lot and returns the generated id.
    ///
    /// ## Errors
    /// * `DbError::ForeignKeyViolation` - product or user does not exist
    pub async fn create(&self, stock: &NewStock) -> DbResult<StockId> {
        debug!(
            product_id = stock.product_id,
            quantity = stock.stock_quantity,
            expiry = %stock.expiry_date,
            "Adding stock lot"
        );

        gateway::fetch_scalar(
            &self.pool,
            r#"
            INSERT INTO stocks (product_id, stock_quantity, expiry_date, user_id)
            VALUES (?, ?, ?, ?)
            RETURNING stock_id
            "#,
            &[
                SqlParam::from(stock.product_id),
                SqlParam::from(stock.stock_quantity),
                SqlParam::from(stock.expiry_date),
                SqlParam::from(stock.user_id),
            ],
        )
        .await
    }

    /// Lists the user's lots joined with their product names.
    pub async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<StockView>> {
        gateway::fetch_all_as(
            &self.pool,
            r#"
            SELECT s.stock_id, p.product_name, s.stock_quantity, s.expiry_date
            FROM stocks s
            JOIN products p ON s.product_id = p.product_id
            WHERE s.user_id = ?
            ORDER BY s.stock_id
            "#,
            &[user_id.into()],
        )
        .await
    }

    /// Lots of `user_id` expiring within `within_days` of today (UTC).
    ///
    /// Already-expired lots are included. `within_days` must be in
    /// `0..=MAX_EXPIRY_WINDOW_DAYS`.
    pub async fn list_expiring(
        &self,
        user_id: UserId,
        within_days: i64,
    ) -> InventoryResult<Vec<StockView>> {
        self.list_expiring_as_of(user_id, within_days, Utc::now().date_naive())
            .await
    }

    /// [`list_expiring`](Self::list_expiring) with an explicit "today".
    pub async fn list_expiring_as_of(
        &self,
        user_id: UserId,
        within_days: i64,
        today: NaiveDate,
    ) -> InventoryResult<Vec<StockView>> {
        let threshold = expiry_threshold(today, within_days)?;

        let lots: Vec<StockView> = gateway::fetch_all_as(
            &self.pool,
            r#"
            SELECT s.stock_id, p.product_name, s.stock_quantity, s.expiry_date
            FROM stocks s
            JOIN products p ON s.product_id = p.product_id
            WHERE s.user_id = ? AND s.expiry_date <= ?
            ORDER BY s.expiry_date, s.stock_id
            "#,
            &[user_id.into(), threshold.into()],
        )
        .await?;

        debug!(user_id, %threshold, count = lots.len(), "Listed expiring stock");
        Ok(lots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DbError, InventoryError};
    use crate::test_support::{date, seed_product, seed_stock, seed_user, test_db};

    #[tokio::test]
    async fn test_add_and_list_stock() {
        let db = test_db().await;
        let ada = seed_user(&db, "ada@example.com").await;
        let milk = seed_product(&db, ada, "Milk").await;

        let stock_id = seed_stock(&db, ada, milk, 12, date(2026, 11, 1)).await;

        let listed = db.stocks().list_for_user(ada).await.unwrap();
        assert_eq!(
            listed,
            vec![StockView {
                stock_id,
                product_name: "Milk".to_string(),
                stock_quantity: 12,
                expiry_date: date(2026, 11, 1),
            }]
        );

        assert!(db.stocks().list_for_user(ada + 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stock_for_unknown_product_is_rejected() {
        let db = test_db().await;
        let ada = seed_user(&db, "ada@example.com").await;

        let err = db
            .stocks()
            .create(&NewStock {
                product_id: 777,
                stock_quantity: 1,
                expiry_date: date(2026, 1, 1),
                user_id: ada,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_expiring_window() {
        let db = test_db().await;
        let ada = seed_user(&db, "ada@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;
        let milk = seed_product(&db, ada, "Milk").await;
        let today = date(2026, 10, 17);

        let expired = seed_stock(&db, ada, milk, 1, date(2026, 10, 12)).await;
        let on_threshold = seed_stock(&db, ada, milk, 2, date(2026, 10, 24)).await;
        seed_stock(&db, ada, milk, 3, date(2026, 10, 25)).await;
        let bobs_product = seed_product(&db, bob, "Bread").await;
        seed_stock(&db, bob, bobs_product, 4, date(2026, 10, 13)).await;

        let ids = |lots: Vec<StockView>| lots.into_iter().map(|s| s.stock_id).collect::<Vec<_>>();

        let week = db.stocks().list_expiring_as_of(ada, 7, today).await.unwrap();
        assert_eq!(ids(week), vec![expired, on_threshold]);

        let none_ahead = db.stocks().list_expiring_as_of(ada, 0, today).await.unwrap();
        assert_eq!(ids(none_ahead), vec![expired]);

        let err = db.stocks().list_expiring_as_of(ada, -1, today).await.unwrap_err();
        assert!(matches!(err, InventoryError::Domain(_)));
    }
}
