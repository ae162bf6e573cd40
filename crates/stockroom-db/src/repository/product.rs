//! # Product Repository
//!
//! Database operations for the per-user product catalog.
//!
//! Deleting a product is not here: it also removes the product's stock, so
//! it is a workflow in [`crate::inventory`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::gateway::{self, SqlParam};
use stockroom_core::{NewProduct, Product, ProductId, UserId};

const PRODUCT_COLUMNS: &str = "product_id, product_name, category, price_cents, user_id";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let product_id = db.products().create(&new_product).await?;
/// let catalog = db.products().list_for_user(user_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product and returns the generated id.
    ///
    /// ## Errors
    /// * `DbError::ForeignKeyViolation` - `user_id` does not exist
    pub async fn create(&self, product: &NewProduct) -> DbResult<ProductId> {
        debug!(
            name = %product.product_name,
            user_id = product.user_id,
            "Creating product"
        );

        let product_id: ProductId = gateway::fetch_scalar(
            &self.pool,
            r#"
            INSERT INTO products (product_name, category, price_cents, user_id)
            VALUES (?, ?, ?, ?)
            RETURNING product_id
            "#,
            &[
                SqlParam::from(product.product_name.trim()),
                SqlParam::from(product.category.trim()),
                SqlParam::from(product.price_cents),
                SqlParam::from(product.user_id),
            ],
        )
        .await?;

        debug!(product_id, "Product created");
        Ok(product_id)
    }

    /// Lists every product owned by `user_id`, oldest first.
    pub async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = ? ORDER BY product_id"
        );
        let products: Vec<Product> =
            gateway::fetch_all_as(&self.pool, &sql, &[user_id.into()]).await?;

        debug!(user_id, count = products.len(), "Listed products");
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::test_support::{seed_user, test_db};

    fn milk(user_id: UserId) -> NewProduct {
        NewProduct {
            product_name: "Milk 1L".to_string(),
            category: "Dairy".to_string(),
            price_cents: 249,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_products() {
        let db = test_db().await;
        let ada = seed_user(&db, "ada@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;

        let product_id = db.products().create(&milk(ada)).await.unwrap();
        db.products().create(&milk(bob)).await.unwrap();

        let listed = db.products().list_for_user(ada).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].product_id, product_id);
        assert_eq!(listed[0].price_cents, 249);
        assert_eq!(listed[0].product_name, "Milk 1L");
        assert_eq!(listed[0].user_id, ada);
    }

    #[tokio::test]
    async fn test_unknown_owner_is_rejected() {
        let db = test_db().await;

        let err = db.products().create(&milk(404)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_for_user_without_products() {
        let db = test_db().await;
        assert!(db.products().list_for_user(1).await.unwrap().is_empty());
    }
}
