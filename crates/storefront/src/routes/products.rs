//! Product catalog route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use jacksnack_core::ProductId;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Cache key for the full catalog.
const CATALOG_KEY: &str = "catalog";

/// List the catalog.
///
/// GET /products
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state
        .catalog_cache()
        .try_get_with(CATALOG_KEY, async {
            ProductRepository::new(state.pool())
                .list()
                .await
                .map(Arc::new)
        })
        .await
        .map_err(|e| AppError::Internal(format!("catalog load failed: {e}")))?;

    Ok(Json(products.as_ref().clone()))
}

/// Show a single product.
///
/// GET /products/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product_id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .get(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    Ok(Json(product))
}
