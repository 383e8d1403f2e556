//! Cart route handlers.
//!
//! All cart routes require session identity; mutations respond with the
//! resulting snapshot, and `/cart/stream` exposes the store's live
//! observation channel as server-sent events.

use std::convert::Infallible;

use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use jacksnack_core::ProductId;
use serde::Deserialize;
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::CartLine;
use crate::services::cart::CartSnapshot;
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<i32>,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Current cart line set.
///
/// GET /cart
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CartLine>>> {
    let items = state.carts().items(user.id).await?;
    Ok(Json(items))
}

/// Add a product to the cart; repeated adds increment the existing line.
///
/// POST /cart/add
#[instrument(skip(state, user), fields(user_id = %user.id, product_id = %request.product_id))]
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<Vec<CartLine>>> {
    let quantity = request.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be at least 1.".to_owned(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .get(&request.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let snapshot = state.carts().add(user.id, &product, quantity).await?;
    Ok(Json(snapshot))
}

/// Remove a line. Removing an absent line succeeds with the unchanged cart.
///
/// POST /cart/remove
#[instrument(skip(state, user), fields(user_id = %user.id, product_id = %request.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<Vec<CartLine>>> {
    let snapshot = state.carts().remove(user.id, &request.product_id).await?;
    Ok(Json(snapshot))
}

/// Clear the whole cart atomically.
///
/// POST /cart/clear
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn clear(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CartLine>>> {
    state.carts().clear(user.id).await?;
    Ok(Json(Vec::new()))
}

/// Live cart snapshots as server-sent events. The first event carries the
/// current state; every mutation pushes a fresh full snapshot. One consumer
/// per session; the stream ends when the client disconnects.
///
/// GET /cart/stream
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn stream(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    // Subscribe before the initial read so no mutation between the two is lost;
    // at worst the client sees the same snapshot twice.
    let receiver = state.carts().subscribe(user.id);
    let initial = state.carts().items(user.id).await?;

    let updates = BroadcastStream::new(receiver)
        // A lagged receiver just waits for the next full snapshot.
        .filter_map(std::result::Result::ok);

    let stream = tokio_stream::once(initial)
        .chain(updates)
        .map(|snapshot: CartSnapshot| Ok(snapshot_event(&snapshot)));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn snapshot_event(snapshot: &CartSnapshot) -> Event {
    Event::default()
        .event("cart")
        .json_data(snapshot)
        .unwrap_or_else(|_| Event::default().event("cart").data("[]"))
}
