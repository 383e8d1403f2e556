//! Cart line model.

use chrono::{DateTime, Utc};
use jacksnack_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product entry in a user's cart.
///
/// Keyed by (user, product); a product appears at most once per cart and
/// repeated adds increment `quantity` instead of duplicating the line.
/// Name, image and price are denormalized from the catalog at add time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub price: Decimal,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Price × quantity for this line, before any promotional override.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let line = CartLine {
            product_id: ProductId::new("prod_2"),
            name: "Vacuum Fried Bhindi Treat Mini - 20 gms".to_string(),
            image_url: "https://example.com/p2.jpg".to_string(),
            price: Decimal::new(5500, 2),
            quantity: 3,
            added_at: Utc::now(),
        };
        assert_eq!(line.line_total(), Decimal::new(16_500, 2));
    }
}
