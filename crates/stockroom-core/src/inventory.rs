//! # Inventory Rules
//!
//! Pure decision logic behind the stock workflows. The database layer reads
//! the current quantities, asks this module what to do, and then applies the
//! answer inside a transaction.
//!
//! ## Sale Depletion (first-expiring, first-out)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product 10, sell 7                                                     │
//! │                                                                         │
//! │  Lots (ordered by expiry_date, stock_id):                               │
//! │    #3  qty 4  exp 2026-01-05   ──► take 4  (lot emptied → deleted)      │
//! │    #1  qty 5  exp 2026-02-01   ──► take 3  (5 → 2)                      │
//! │    #8  qty 9  exp 2026-06-30   ──► untouched                            │
//! │                                                                         │
//! │  available = 18, remaining = 11                                        │
//! │  sell 19 → InsufficientStock (nothing is touched)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Zero-Quantity Policy
//! A lot that reaches exactly zero is deleted, whether it was emptied by a
//! sale or by an explicit removal. No zero-quantity rows are kept.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{ProductId, Removal, StockId};
use crate::validation::{validate_quantity, validate_window_days, ValidationResult};

/// Quantity on hand for one stock lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Lot {
    pub stock_id: StockId,
    pub stock_quantity: i64,
}

/// Units to take from one lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotDraw {
    pub stock_id: StockId,
    pub take: i64,
    /// Quantity the lot held when the plan was made.
    pub on_hand: i64,
}

impl LotDraw {
    /// True when this draw takes everything left in the lot.
    #[inline]
    pub fn empties_lot(&self) -> bool {
        self.take == self.on_hand
    }
}

/// How a sale will be spread across a product's lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepletionPlan {
    pub draws: Vec<LotDraw>,
    /// Total units across all lots before the sale.
    pub available: i64,
    /// Total units across all lots after the sale.
    pub remaining: i64,
}

/// Plans a sale of `requested` units against `lots`.
///
/// `lots` must already be in the order they should be drawn from
/// (earliest expiry first). Lots with no units are skipped.
///
/// ## Errors
/// - `Validation` if `requested` is not a positive quantity
/// - `InsufficientStock` if there are no lots or they hold fewer than
///   `requested` units in total
pub fn plan_depletion(
    product_id: ProductId,
    lots: &[Lot],
    requested: i64,
) -> CoreResult<DepletionPlan> {
    validate_quantity(requested)?;

    let available: i64 = lots.iter().map(|lot| lot.stock_quantity.max(0)).sum();
    if lots.is_empty() || requested > available {
        return Err(CoreError::insufficient_for_product(
            product_id, available, requested,
        ));
    }

    let mut outstanding = requested;
    let mut draws = Vec::new();

    for lot in lots {
        if outstanding == 0 {
            break;
        }
        if lot.stock_quantity <= 0 {
            continue;
        }

        let take = outstanding.min(lot.stock_quantity);
        draws.push(LotDraw {
            stock_id: lot.stock_id,
            take,
            on_hand: lot.stock_quantity,
        });
        outstanding -= take;
    }

    Ok(DepletionPlan {
        draws,
        available,
        remaining: available - requested,
    })
}

/// Decides what removing `requested` units from a single lot does.
///
/// ```rust
/// use stockroom_core::inventory::plan_removal;
///
/// let removal = plan_removal(1, 2, 2).unwrap();
/// assert!(removal.fully_removed);
///
/// let removal = plan_removal(1, 5, 2).unwrap();
/// assert_eq!(removal.remaining, 3);
///
/// assert!(plan_removal(1, 1, 2).is_err());
/// ```
pub fn plan_removal(stock_id: StockId, on_hand: i64, requested: i64) -> CoreResult<Removal> {
    validate_quantity(requested)?;

    if requested > on_hand {
        return Err(CoreError::insufficient_for_lot(stock_id, on_hand, requested));
    }

    Ok(Removal {
        stock_id,
        fully_removed: requested == on_hand,
        remaining: on_hand - requested,
    })
}

/// Last expiry date included in an expiring-stock query run on `today`.
///
/// `within_days = 0` includes only lots expiring today or earlier.
pub fn expiry_threshold(today: NaiveDate, within_days: i64) -> ValidationResult<NaiveDate> {
    validate_window_days(within_days)?;

    // Non-negative after validation.
    today
        .checked_add_days(Days::new(within_days as u64))
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "days".to_string(),
            reason: "threshold date is out of range".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
