//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────┐  ┌─────────────────┐  ┌─────────────────┐           │
//! │  │     User      │  │    Product      │  │     Stock       │           │
//! │  │  ───────────  │  │  ─────────────  │  │  ─────────────  │           │
//! │  │  user_id      │◄─│  user_id        │◄─│  product_id     │           │
//! │  │  email (uniq) │  │  product_name   │  │  stock_quantity │           │
//! │  │  password_hash│  │  price_cents    │  │  expiry_date    │           │
//! │  └───────────────┘  └─────────────────┘  └─────────────────┘           │
//! │                              ▲                                          │
//! │                     ┌────────┴────────┐                                 │
//! │                     │      Sale       │  product_id is NOT a foreign    │
//! │                     │  ─────────────  │  key: sales outlive the product │
//! │                     │  quantity_sold  │                                 │
//! │                     │  sale_date      │                                 │
//! │                     └─────────────────┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by an integer id generated by the store. Ownership
//! is a plain `user_id` column: a partitioning convention, not a security
//! boundary.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Store-generated user identifier.
pub type UserId = i64;
/// Store-generated product identifier.
pub type ProductId = i64;
/// Store-generated stock lot identifier.
pub type StockId = i64;
/// Store-generated sale identifier.
pub type SaleId = i64;

// =============================================================================
// User
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    /// PHC-format argon2 hash; never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    /// Price in cents (smallest currency unit).
    pub price_cents: i64,
    pub user_id: UserId,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub category: String,
    pub price_cents: i64,
    pub user_id: UserId,
}

// =============================================================================
// Stock
// =============================================================================

/// A quantity of one product sharing a single expiry date (a "lot").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Stock {
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub stock_quantity: i64,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    pub user_id: UserId,
}

/// Input for adding a stock lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStock {
    pub product_id: ProductId,
    pub stock_quantity: i64,
    pub expiry_date: NaiveDate,
    pub user_id: UserId,
}

/// Stock lot joined with its product name, as listed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockView {
    pub stock_id: StockId,
    pub product_name: String,
    pub stock_quantity: i64,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of units sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity_sold: i64,
    pub user_id: UserId,
    #[ts(as = "String")]
    pub sale_date: NaiveDateTime,
}

/// Sale joined with its product name, as listed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleView {
    pub sale_id: SaleId,
    pub product_name: String,
    pub quantity_sold: i64,
    #[ts(as = "String")]
    pub sale_date: NaiveDateTime,
}

// =============================================================================
// Workflow Outcomes
// =============================================================================

/// Result of a successful sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleReceipt {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity_sold: i64,
    /// Units left across all lots of the product after the sale.
    pub remaining: i64,
    /// Lots that were deleted because the sale emptied them.
    pub lots_emptied: Vec<StockId>,
}

/// Result of removing units from one stock lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Removal {
    pub stock_id: StockId,
    /// True when the lot reached zero and was deleted.
    pub fully_removed: bool,
    pub remaining: i64,
}

/// Result of deleting a product together with its stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeletedProduct {
    pub product_id: ProductId,
    pub stocks_removed: u64,
}

// =============================================================================
// Unit Tests
// =============================================================================
