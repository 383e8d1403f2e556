//! Catalog product model.

use jacksnack_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An immutable catalog product.
///
/// Quantity is a cart-local concept; it never appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
