//! Product catalog endpoints.
//!
//! Prices travel as decimals (`"price": 2.49`) and are stored as cents.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use stockroom_core::validation::{
    validate_category, validate_id, validate_price_cents, validate_product_name,
};
use stockroom_core::{Money, NewProduct, Product, ProductId, UserId, ValidationError};

use super::{MessageResponse, UserQuery};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct AddProductRequest {
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddProductResponse {
    pub message: String,
    pub product_id: ProductId,
}

/// Product as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDto {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub user_id: UserId,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        ProductDto {
            price: product.price().to_decimal(),
            product_id: product.product_id,
            product_name: product.product_name,
            category: product.category,
            user_id: product.user_id,
        }
    }
}

/// `POST /products/`
pub async fn add_product(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AddProductRequest>, JsonRejection>,
) -> Result<Json<AddProductResponse>, ApiError> {
    let Json(req) = body?;

    validate_product_name(&req.product_name)?;
    validate_category(&req.category)?;
    validate_id("user_id", req.user_id)?;

    let price = Money::from_decimal(req.price).ok_or_else(|| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "must be a finite number".to_string(),
    })?;
    validate_price_cents(price.cents())?;

    let product_id = state
        .db
        .products()
        .create(&NewProduct {
            product_name: req.product_name,
            category: req.category,
            price_cents: price.cents(),
            user_id: req.user_id,
        })
        .await?;

    Ok(Json(AddProductResponse {
        message: "Product added successfully".to_string(),
        product_id,
    }))
}

/// `GET /products/?user_id=`
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let Query(query) = query?;

    let products = state.db.products().list_for_user(query.user_id).await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// `DELETE /products/{product_id}`
///
/// Also deletes the product's stock; its sales are kept.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    path: Result<Path<ProductId>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(product_id) = path?;

    state.db.inventory().delete_product(product_id).await?;

    Ok(Json(MessageResponse::new(
        "Product and associated stocks deleted successfully",
    )))
}
