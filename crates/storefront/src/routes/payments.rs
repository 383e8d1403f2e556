//! Payment gateway callback handlers.
//!
//! The gateway redirects the customer here after a successful payment with
//! the payment reference in the query string; dismissing the gateway page
//! instead posts a cancel. A cancelled attempt leaves no order row and sends
//! no notification - nothing durable existed yet.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::checkout::PlacedOrder;
use crate::state::AppState;

/// Query parameters appended by the gateway on the success redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Our checkout attempt id, set when the payment link was created.
    pub attempt: String,
    /// The gateway payment reference.
    pub razorpay_payment_id: Option<String>,
}

/// Cancel request body.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub attempt_id: String,
}

/// Cancel acknowledgement.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Gateway success callback: finalize the pending attempt exactly once.
///
/// GET /payments/callback
#[instrument(skip(state, params), fields(attempt = %params.attempt))]
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<PlacedOrder>> {
    let payment_id = params.razorpay_payment_id.ok_or_else(|| {
        AppError::Validation("Missing payment reference on gateway callback.".to_owned())
    })?;

    let placed = state
        .checkout()
        .confirm_payment(&params.attempt, &payment_id)
        .await?;

    Ok(Json(placed))
}

/// The customer dismissed the gateway page. Informational, never an error;
/// repeated cancels of the same attempt are fine.
///
/// POST /payments/cancel
#[instrument(skip(state, request), fields(attempt = %request.attempt_id))]
pub async fn cancel(
    State(state): State<AppState>,
    Json(request): Json<CancelRequest>,
) -> Json<CancelResponse> {
    state.checkout().cancel_payment(&request.attempt_id).await;

    Json(CancelResponse {
        status: "cancelled",
        message: "You canceled the payment process. Nothing has been charged.",
    })
}
