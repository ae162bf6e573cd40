//! Stock lot endpoints.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use stockroom_core::validation::{validate_id, validate_quantity};
use stockroom_core::{NewStock, ProductId, StockId, StockView, UserId, DEFAULT_EXPIRY_WINDOW_DAYS};

use super::UserQuery;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct AddStockRequest {
    pub product_id: ProductId,
    pub stock_quantity: i64,
    /// ISO date, `YYYY-MM-DD`
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddStockResponse {
    pub message: String,
    pub stock_id: StockId,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ExpiringQuery {
    pub user_id: UserId,
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RemoveStockQuery {
    pub stock_id: StockId,
    pub quantity: i64,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RemoveStockResponse {
    pub message: String,
    pub fully_removed: bool,
    pub remaining: i64,
}

/// `POST /stocks/`
pub async fn add_stock(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AddStockRequest>, JsonRejection>,
) -> Result<Json<AddStockResponse>, ApiError> {
    let Json(req) = body?;

    validate_id("product_id", req.product_id)?;
    validate_id("user_id", req.user_id)?;
    validate_quantity(req.stock_quantity)?;

    let stock_id = state
        .db
        .stocks()
        .create(&NewStock {
            product_id: req.product_id,
            stock_quantity: req.stock_quantity,
            expiry_date: req.expiry_date,
            user_id: req.user_id,
        })
        .await?;

    Ok(Json(AddStockResponse {
        message: "Stock added successfully".to_string(),
        stock_id,
    }))
}

/// `GET /stocks/?user_id=`
pub async fn list_stocks(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<StockView>>, ApiError> {
    let Query(query) = query?;

    Ok(Json(state.db.stocks().list_for_user(query.user_id).await?))
}

/// `GET /stocks/expiring/?user_id=&days=`
///
/// `days` defaults to 7. Lots that have already expired are included.
pub async fn list_expiring(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExpiringQuery>, QueryRejection>,
) -> Result<Json<Vec<StockView>>, ApiError> {
    let Query(query) = query?;
    let days = query.days.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS);

    let lots = state.db.stocks().list_expiring(query.user_id, days).await?;
    Ok(Json(lots))
}

/// `DELETE /stocks/?stock_id=&quantity=&user_id=`
pub async fn remove_stock(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RemoveStockQuery>, QueryRejection>,
) -> Result<Json<RemoveStockResponse>, ApiError> {
    let Query(query) = query?;

    let removal = state
        .db
        .inventory()
        .remove_stock(query.stock_id, query.quantity, query.user_id)
        .await?;

    let message = if removal.fully_removed {
        "Stock completely removed".to_string()
    } else {
        format!(
            "Stock reduced by {}. Remaining stock: {}",
            query.quantity, removal.remaining
        )
    };

    Ok(Json(RemoveStockResponse {
        message,
        fully_removed: removal.fully_removed,
        remaining: removal.remaining,
    }))
}
