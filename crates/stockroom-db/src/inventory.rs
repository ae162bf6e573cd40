//! # Inventory Workflows
//!
//! Multi-statement stock operations, each run in one transaction.
//!
//! ## Record Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    product exists?                         no ──► ProductNotFound      │
//! │    SELECT lots ORDER BY expiry_date, stock_id                          │
//! │    plan_depletion(lots, qty)               short ──► InsufficientStock │
//! │    INSERT sale RETURNING sale_id                                       │
//! │    for each draw:                                                      │
//! │      empties lot?  DELETE ... AND stock_quantity = on_hand             │
//! │      otherwise     UPDATE ... AND stock_quantity >= take               │
//! │      rows_affected != 1  ──► InsufficientStock (lost a race)           │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any early return drops the transaction, which rolls it back: a sale row
//! never exists without its matching decrement.
//!
//! SQLite has no `SELECT ... FOR UPDATE`. Workflows open with
//! `BEGIN IMMEDIATE`, so the write lock is taken before the first read and
//! concurrent workflows queue on the busy timeout instead of failing on
//! lock upgrade. Each write is still guarded by the quantity read earlier
//! in the transaction, and a guard that matches no row aborts the whole
//! workflow.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult, InventoryError, InventoryResult};
use crate::gateway::{self, SqlParam};
use stockroom_core::inventory::{plan_depletion, plan_removal, Lot, LotDraw};
use stockroom_core::validation::{validate_id, validate_quantity};
use stockroom_core::{
    CoreError, DeletedProduct, ProductId, Removal, SaleId, SaleReceipt, StockId, UserId,
};

/// Transactional stock workflows.
///
/// ## Usage
/// ```rust,ignore
/// let receipt = db.inventory().record_sale(product_id, 3, user_id).await?;
/// let removal = db.inventory().remove_stock(stock_id, 2, user_id).await?;
/// let deleted = db.inventory().delete_product(product_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryService {
    pool: SqlitePool,
}

impl InventoryService {
    /// Creates a new InventoryService.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryService { pool }
    }

    /// Opens a write transaction holding the database write lock.
    async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }

    async fn commit(tx: Transaction<'static, Sqlite>) -> DbResult<()> {
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }

    /// Records a sale of `quantity_sold` units and depletes stock to match.
    ///
    /// Availability is summed over every lot of the product. Units are taken
    /// from the earliest-expiring lots first; a lot brought to zero is
    /// deleted.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - quantity not positive
    /// * `CoreError::ProductNotFound` - no such product
    /// * `CoreError::InsufficientStock` - not enough units (nothing changes)
    pub async fn record_sale(
        &self,
        product_id: ProductId,
        quantity_sold: i64,
        user_id: UserId,
    ) -> InventoryResult<SaleReceipt> {
        validate_id("product_id", product_id)?;
        validate_id("user_id", user_id)?;
        validate_quantity(quantity_sold)?;

        debug!(product_id, quantity_sold, user_id, "Recording sale");

        let mut tx = self.begin().await?;

        if !product_exists(&mut tx, product_id).await? {
            warn!(product_id, "Sale rejected: unknown product");
            return Err(CoreError::ProductNotFound(product_id).into());
        }

        let lots: Vec<Lot> = gateway::fetch_all_as(
            &mut *tx,
            r#"
            SELECT stock_id, stock_quantity
            FROM stocks
            WHERE product_id = ?
            ORDER BY expiry_date, stock_id
            "#,
            &[product_id.into()],
        )
        .await?;

        let plan = plan_depletion(product_id, &lots, quantity_sold).inspect_err(|e| {
            warn!(product_id, quantity_sold, error = %e, "Sale rejected");
        })?;

        let sale_id: SaleId = gateway::fetch_scalar(
            &mut *tx,
            r#"
            INSERT INTO sales (product_id, quantity_sold, user_id)
            VALUES (?, ?, ?)
            RETURNING sale_id
            "#,
            &[
                SqlParam::from(product_id),
                SqlParam::from(quantity_sold),
                SqlParam::from(user_id),
            ],
        )
        .await?;

        let mut lots_emptied = Vec::new();
        for draw in &plan.draws {
            apply_draw(&mut tx, draw, || {
                CoreError::insufficient_for_product(product_id, plan.available, quantity_sold)
            })
            .await?;

            if draw.empties_lot() {
                lots_emptied.push(draw.stock_id);
            }
        }

        Self::commit(tx).await?;

        info!(
            sale_id,
            product_id,
            quantity_sold,
            remaining = plan.remaining,
            lots_emptied = lots_emptied.len(),
            "Sale recorded"
        );

        Ok(SaleReceipt {
            sale_id,
            product_id,
            quantity_sold,
            remaining: plan.remaining,
            lots_emptied,
        })
    }

    /// Removes `quantity` units from one lot owned by `user_id`.
    ///
    /// Removing everything deletes the lot.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - quantity not positive
    /// * `CoreError::StockNotFound` - no such lot for this user
    /// * `CoreError::InsufficientStock` - more than the lot holds (unchanged)
    pub async fn remove_stock(
        &self,
        stock_id: StockId,
        quantity: i64,
        user_id: UserId,
    ) -> InventoryResult<Removal> {
        validate_id("stock_id", stock_id)?;
        validate_id("user_id", user_id)?;
        validate_quantity(quantity)?;

        debug!(stock_id, quantity, user_id, "Removing stock");

        let mut tx = self.begin().await?;

        let on_hand: Option<i64> = gateway::fetch_optional_scalar(
            &mut *tx,
            "SELECT stock_quantity FROM stocks WHERE stock_id = ? AND user_id = ?",
            &[stock_id.into(), user_id.into()],
        )
        .await?;

        let Some(on_hand) = on_hand else {
            warn!(stock_id, user_id, "Removal rejected: unknown stock");
            return Err(CoreError::StockNotFound { stock_id }.into());
        };

        let removal = plan_removal(stock_id, on_hand, quantity).inspect_err(|e| {
            warn!(stock_id, quantity, error = %e, "Removal rejected");
        })?;

        let draw = LotDraw {
            stock_id,
            take: quantity,
            on_hand,
        };
        apply_draw(&mut tx, &draw, || {
            CoreError::insufficient_for_lot(stock_id, on_hand, quantity)
        })
        .await?;

        Self::commit(tx).await?;

        info!(
            stock_id,
            quantity,
            fully_removed = removal.fully_removed,
            remaining = removal.remaining,
            "Stock removed"
        );

        Ok(removal)
    }

    /// Deletes a product and every stock lot that references it.
    ///
    /// Sales of the product are kept.
    ///
    /// ## Errors
    /// * `CoreError::ProductNotFound` - no such product
    pub async fn delete_product(&self, product_id: ProductId) -> InventoryResult<DeletedProduct> {
        validate_id("product_id", product_id)?;

        debug!(product_id, "Deleting product");

        let mut tx = self.begin().await?;

        if !product_exists(&mut tx, product_id).await? {
            warn!(product_id, "Delete rejected: unknown product");
            return Err(CoreError::ProductNotFound(product_id).into());
        }

        let stocks_removed = gateway::execute(
            &mut *tx,
            "DELETE FROM stocks WHERE product_id = ?",
            &[product_id.into()],
        )
        .await?
        .rows_affected();

        gateway::execute(
            &mut *tx,
            "DELETE FROM products WHERE product_id = ?",
            &[product_id.into()],
        )
        .await?;

        Self::commit(tx).await?;

        info!(product_id, stocks_removed, "Product deleted");

        Ok(DeletedProduct {
            product_id,
            stocks_removed,
        })
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

async fn product_exists(
    tx: &mut Transaction<'static, Sqlite>,
    product_id: ProductId,
) -> DbResult<bool> {
    let found: Option<i64> = gateway::fetch_optional_scalar(
        &mut **tx,
        "SELECT 1 FROM products WHERE product_id = ?",
        &[product_id.into()],
    )
    .await?;

    Ok(found.is_some())
}

/// Takes `draw.take` units from one lot, deleting it when it empties.
///
/// Both statements only match if the lot still holds what the plan saw,
/// otherwise `shortfall` is returned and the caller's transaction is dropped.
async fn apply_draw(
    tx: &mut Transaction<'static, Sqlite>,
    draw: &LotDraw,
    shortfall: impl FnOnce() -> CoreError,
) -> InventoryResult<()> {
    let outcome = if draw.empties_lot() {
        gateway::execute(
            &mut **tx,
            "DELETE FROM stocks WHERE stock_id = ? AND stock_quantity = ?",
            &[draw.stock_id.into(), draw.on_hand.into()],
        )
        .await?
    } else {
        gateway::execute(
            &mut **tx,
            r#"
            UPDATE stocks
            SET stock_quantity = stock_quantity - ?
            WHERE stock_id = ? AND stock_quantity >= ?
            "#,
            &[draw.take.into(), draw.stock_id.into(), draw.take.into()],
        )
        .await?
    };

    if outcome.rows_affected() != 1 {
        warn!(
            stock_id = draw.stock_id,
            take = draw.take,
            "Stock changed during workflow"
        );
        return Err(InventoryError::Domain(shortfall()));
    }

    debug!(
        stock_id = draw.stock_id,
        take = draw.take,
        emptied = draw.empties_lot(),
        "Lot drawn"
    );
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
