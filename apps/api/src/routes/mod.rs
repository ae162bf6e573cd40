//! # HTTP Routes
//!
//! | Method | Path                       | Handler                        |
//! |--------|----------------------------|--------------------------------|
//! | POST   | `/signup/`                 | [`accounts::signup`]           |
//! | POST   | `/login/`                  | [`accounts::login`]            |
//! | POST   | `/products/`               | [`products::add_product`]      |
//! | GET    | `/products/?user_id=`      | [`products::list_products`]    |
//! | DELETE | `/products/{product_id}`   | [`products::delete_product`]   |
//! | POST   | `/stocks/`                 | [`stocks::add_stock`]          |
//! | GET    | `/stocks/?user_id=`        | [`stocks::list_stocks`]        |
//! | DELETE | `/stocks/?stock_id=&...`   | [`stocks::remove_stock`]       |
//! | GET    | `/stocks/expiring/?...`    | [`stocks::list_expiring`]      |
//! | POST   | `/sales/`                  | [`sales::record_sale`]         |
//! | GET    | `/sales/?user_id=`         | [`sales::list_sales`]          |
//! | GET    | `/health`                  | [`health::health`]             |

pub mod accounts;
pub mod health;
pub mod products;
pub mod sales;
pub mod stocks;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use ts_rs::TS;

use stockroom_core::UserId;

use crate::AppState;

/// Builds the router with CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/signup/", post(accounts::signup))
        .route("/login/", post(accounts::login))
        .route(
            "/products/",
            post(products::add_product).get(products::list_products),
        )
        .route("/products/{product_id}", delete(products::delete_product))
        .route(
            "/stocks/",
            post(stocks::add_stock)
                .get(stocks::list_stocks)
                .delete(stocks::remove_stock),
        )
        .route("/stocks/expiring/", get(stocks::list_expiring))
        .route("/sales/", post(sales::record_sale).get(sales::list_sales))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Any origin, method and header, with credentials.
///
/// Browsers reject `*` together with credentials, so the request's own
/// origin, method and headers are mirrored back.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// `?user_id=` on the listing endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UserQuery {
    pub user_id: UserId,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
