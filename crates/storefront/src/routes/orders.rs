//! Order read route handlers.
//!
//! Orders are immutable; the only thing a client can do after checkout is
//! fetch the confirmation.

use axum::{
    Json,
    extract::{Path, State},
};
use jacksnack_core::OrderId;
use tracing::instrument;
use uuid::Uuid;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::Order;
use crate::state::AppState;

/// Fetch a persisted order by id.
///
/// GET /orders/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    let uuid = Uuid::parse_str(&id)
        .map_err(|_| AppError::NotFound(format!("order {id}")))?;

    let order = OrderRepository::new(state.pool())
        .get(OrderId::new(uuid))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(order))
}
