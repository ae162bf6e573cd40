//! Sale endpoints.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use stockroom_core::{ProductId, SaleId, SaleView, UserId};

use super::UserQuery;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct RecordSaleRequest {
    pub product_id: ProductId,
    pub quantity_sold: i64,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecordSaleResponse {
    pub message: String,
    pub sale_id: SaleId,
    /// Units of the product left after the sale
    pub remaining: i64,
}

/// `POST /sales/`
///
/// 400 `INSUFFICIENT_STOCK` if the product's lots hold too few units,
/// 404 if the product doesn't exist. Either way nothing is written.
pub async fn record_sale(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RecordSaleRequest>, JsonRejection>,
) -> Result<Json<RecordSaleResponse>, ApiError> {
    let Json(req) = body?;

    let receipt = state
        .db
        .inventory()
        .record_sale(req.product_id, req.quantity_sold, req.user_id)
        .await?;

    Ok(Json(RecordSaleResponse {
        message: "Sale added and stock updated successfully".to_string(),
        sale_id: receipt.sale_id,
        remaining: receipt.remaining,
    }))
}

/// `GET /sales/?user_id=`
pub async fn list_sales(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<SaleView>>, ApiError> {
    let Query(query) = query?;

    Ok(Json(state.db.sales().list_for_user(query.user_id).await?))
}
