//! Liveness check.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::{ApiError, ErrorCode};
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `GET /health`: 200 while the database answers, 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    if state.db.health_check().await {
        Ok(Json(HealthResponse { status: "ok" }))
    } else {
        tracing::warn!("Health check failed: database unreachable");
        Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::Unavailable,
            "Database unavailable",
        ))
    }
}
