//! Signup and login.
//!
//! Login only checks credentials and returns the account's `user_id`; there
//! are no sessions or tokens, and other endpoints take `user_id` as input.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use stockroom_core::validation::{validate_email, validate_password, validate_username};
use stockroom_core::{CoreError, UserId};

use super::MessageResponse;
use crate::auth::{hash_password_async, verify_password_async};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: UserId,
}

/// `POST /signup/`
pub async fn signup(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = body?;

    validate_username(&req.username)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let email = req.email.trim().to_string();
    let users = state.db.users();

    if users.exists_by_email(&email).await? {
        warn!(email = %email, "Signup rejected: email already registered");
        return Err(CoreError::DuplicateEmail(email).into());
    }

    let password_hash = hash_password_async(req.password).await?;
    let user_id = users.create(&req.username, &email, &password_hash).await?;

    info!(user_id, "User registered");
    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// `POST /login/`
///
/// Unknown email and wrong password give the same answer.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = body?;

    let Some(user) = state.db.users().get_by_email(&req.email).await? else {
        warn!("Login rejected: unknown email");
        return Err(CoreError::InvalidCredentials.into());
    };

    if !verify_password_async(req.password, user.password_hash.clone()).await? {
        warn!(user_id = user.user_id, "Login rejected: wrong password");
        return Err(CoreError::InvalidCredentials.into());
    }

    info!(user_id = user.user_id, "User logged in");
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user_id: user.user_id,
    }))
}
