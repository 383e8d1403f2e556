//! Session identity route handlers.
//!
//! Login only establishes who the cart belongs to. There are no passwords or
//! profiles here; carts and orders need an owner and this is where one is
//! minted.

use axum::{Json, extract::State};
use jacksnack_core::Email;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::{User, session_keys};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Logout acknowledgement.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Establish session identity by email, creating the user on first login.
///
/// POST /auth/login
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>> {
    let email = Email::parse(&request.email)
        .map_err(|_| AppError::Validation("Please enter a valid email.".to_owned()))?;

    let user = UserRepository::new(state.pool())
        .find_or_create(&email)
        .await?;

    session
        .insert(session_keys::USER_ID, user.id)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    Ok(Json(user))
}

/// Drop the session. Live cart streams for this session end when the client
/// disconnects; the cart rows themselves are untouched.
///
/// POST /auth/logout
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<LogoutResponse>> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session flush failed: {e}")))?;

    Ok(Json(LogoutResponse { success: true }))
}
