//! Session-based identity extraction.
//!
//! Cart and checkout routes extract [`CurrentUser`]; a request with no
//! signed-in user is rejected with the auth error before any handler logic
//! runs, so no partial state is ever written for anonymous callers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jacksnack_core::UserId;
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::{User, session_keys};
use crate::state::AppState;

/// The signed-in user for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(format!("session unavailable: {msg}")))?;

        let user_id: UserId = session
            .get(session_keys::USER_ID)
            .await
            .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
            .ok_or(AppError::AuthRequired)?;

        let user = UserRepository::new(state.pool())
            .get(user_id)
            .await?
            .ok_or(AppError::AuthRequired)?;

        Ok(Self(user))
    }
}
