//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule outcomes                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  ├── DbError          - Store failures                                 │
//! │  └── InventoryError   - CoreError | DbError from a workflow            │
//! │                                                                         │
//! │  HTTP errors (apps/api)                                                │
//! │  └── ApiError         - Status code + JSON body                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → InventoryError → ApiError         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::{ProductId, StockId};

// =============================================================================
// Core Error
// =============================================================================

/// Business rule outcomes that stop an operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No stock lot matches the id for this user.
    ///
    /// ## When This Occurs
    /// - Stock id doesn't exist
    /// - Stock id exists but belongs to another user
    /// - Lot was already fully removed
    #[error("Stock not found for this product and user: {stock_id}")]
    StockNotFound { stock_id: StockId },

    /// Not enough stock to sell or remove the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Record sale (qty: 10)
    ///      │
    ///      ▼
    /// Sum lots for product: available=2
    ///      │
    ///      ▼
    /// InsufficientStock { subject: "product 10", available: 2, requested: 10 }
    ///      │
    ///      ▼
    /// 400: "Insufficient stock for product 10: available 2, requested 10"
    /// ```
    #[error("Insufficient stock for {subject}: available {available}, requested {requested}")]
    InsufficientStock {
        subject: String,
        available: i64,
        requested: i64,
    },

    /// Signup with an email that already has an account.
    #[error("User with this email already exists")]
    DuplicateEmail(String),

    /// Login with an unknown email or a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Insufficient stock across all lots of a product.
    pub fn insufficient_for_product(product_id: ProductId, available: i64, requested: i64) -> Self {
        CoreError::InsufficientStock {
            subject: format!("product {}", product_id),
            available,
            requested,
        }
    }

    /// Insufficient stock in a single lot.
    pub fn insufficient_for_lot(stock_id: StockId, available: i64, requested: i64) -> Self {
        CoreError::InsufficientStock {
            subject: format!("stock {}", stock_id),
            available,
            requested,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any statement runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email, non-finite price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
