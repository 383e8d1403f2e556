//! Checkout route handlers.
//!
//! Two surfaces, one assembler: `/checkout` submits the signed-in user's
//! cart, `/buy/{id}` submits a single product with quantity 1. Both accept an
//! optional client-supplied idempotency key; without one the server
//! generates a key, so a network-level retry of the same request body is
//! only deduplicated when the client provides the key.

use axum::{
    Json,
    extract::{Path, State},
};
use jacksnack_core::{Email, PaymentMethod, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::ShippingInfo;
use crate::services::CheckoutOutcome;
use crate::state::AppState;

/// Cart checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub idempotency_key: Option<String>,
}

/// Buy-now request body; carries the contact email the cart flow takes from
/// the signed-in user.
#[derive(Debug, Deserialize)]
pub struct BuyNowRequest {
    pub email: String,
    #[serde(flatten)]
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub idempotency_key: Option<String>,
}

/// Check out the whole cart.
///
/// POST /checkout
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutOutcome>> {
    let outcome = state
        .checkout()
        .checkout_cart(
            user.id,
            user.email.as_str(),
            &request.shipping,
            request.payment_method,
            request.idempotency_key,
        )
        .await?;

    Ok(Json(outcome))
}

/// Buy a single product without involving the cart.
///
/// POST /buy/{id}
#[instrument(skip(state, request), fields(product_id = %id))]
pub async fn buy_now(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<BuyNowRequest>,
) -> Result<Json<CheckoutOutcome>> {
    let email = Email::parse(&request.email)
        .map_err(|e| AppError::Validation(format!("Please enter a valid email: {e}")))?;

    let outcome = state
        .checkout()
        .buy_now(
            &ProductId::new(id),
            email.as_str(),
            &request.shipping,
            request.payment_method,
            request.idempotency_key,
        )
        .await?;

    Ok(Json(outcome))
}
