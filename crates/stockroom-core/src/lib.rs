//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate holds the rules every other layer must agree on: what a stock
//! lot is, how much may be taken from it, and what counts as valid input.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    /signup  /products  /stocks  /sales  /stocks/expiring       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               stockroom-db (Gateway + Workflows)                │   │
//! │  │        transactions, repositories, SQLite statements            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ inventory │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ depletion │  │   rules   │  │   │
//! │  │   │  Stock    │  │           │  │  removal  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Stock, Sale and their views)
//! - [`money`] - Money type with integer arithmetic
//! - [`inventory`] - Lot depletion and removal planning
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::inventory::{plan_depletion, Lot};
//!
//! let lots = [Lot { stock_id: 1, stock_quantity: 5 }];
//! let plan = plan_depletion(10, &lots, 3).unwrap();
//!
//! assert_eq!(plan.remaining, 2);
//! assert_eq!(plan.draws[0].take, 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default look-ahead window for the expiring-stock query, in days.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 7;

/// Longest look-ahead window the expiring-stock query accepts (ten years).
pub const MAX_EXPIRY_WINDOW_DAYS: i64 = 3650;

/// Largest quantity accepted for a single stock lot, sale or removal.
///
/// ## Business Reason
/// Catches typos (an extra few zeros) before they reach the ledger.
pub const MAX_QUANTITY: i64 = 1_000_000;
