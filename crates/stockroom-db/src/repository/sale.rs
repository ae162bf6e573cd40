//! # Sale Repository
//!
//! Read access to sale history. Sales are written only by
//! [`crate::inventory::InventoryService::record_sale`], together with the
//! stock decrement they cause.

use sqlx::SqlitePool;

use crate::error::DbResult;
use crate::gateway;
use stockroom_core::{ProductId, SaleView, UserId};

/// Repository for sale history.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists the user's sales joined with their product names.
    ///
    /// Sales whose product has since been deleted are kept in the store
    /// but have no name to show, so they are not listed here.
    pub async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<SaleView>> {
        gateway::fetch_all_as(
            &self.pool,
            r#"
            SELECT s.sale_id, p.product_name, s.quantity_sold, s.sale_date
            FROM sales s
            JOIN products p ON s.product_id = p.product_id
            WHERE s.user_id = ?
            ORDER BY s.sale_id
            "#,
            &[user_id.into()],
        )
        .await
    }

    /// Counts sales recorded for a product, whether or not it still exists.
    pub async fn count_for_product(&self, product_id: ProductId) -> DbResult<i64> {
        gateway::fetch_scalar(
            &self.pool,
            "SELECT COUNT(*) FROM sales WHERE product_id = ?",
            &[product_id.into()],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{date, seed_product, seed_stock, seed_user, test_db};

    #[tokio::test]
    async fn test_list_sales_for_user() {
        let db = test_db().await;
        let ada = seed_user(&db, "ada@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;
        let milk = seed_product(&db, ada, "Milk").await;
        seed_stock(&db, ada, milk, 10, date(2026, 12, 1)).await;

        let receipt = db.inventory().record_sale(milk, 3, ada).await.unwrap();

        let sales = db.sales().list_for_user(ada).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].sale_id, receipt.sale_id);
        assert_eq!(sales[0].product_name, "Milk");
        assert_eq!(sales[0].quantity_sold, 3);

        assert!(db.sales().list_for_user(bob).await.unwrap().is_empty());
        assert_eq!(db.sales().count_for_product(milk).await.unwrap(), 1);
    }
}
