//! Catalog seeding command.
//!
//! # Usage
//!
//! ```bash
//! jack-cli seed
//! ```
//!
//! Upserts the store's product catalog. Safe to re-run; existing rows are
//! replaced by id.

use jacksnack_core::ProductId;
use jacksnack_storefront::db::ProductRepository;
use jacksnack_storefront::models::Product;
use rust_decimal::Decimal;

use super::{CommandError, connect};

/// The catalog. Prices are rupees.
fn catalog() -> Vec<Product> {
    let entry = |id: &str, name: &str, image: &str, cents: i64| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        image_url: image.to_string(),
        price: Decimal::new(cents, 2),
        description: None,
    };

    vec![
        entry(
            "prod_1",
            "Jacksnack Alpha",
            "https://picsum.photos/400/600?random=1",
            100,
        ),
        entry(
            "prod_2",
            "Vacuum Fried Bhindi Treat Mini - 20 gms",
            "https://picsum.photos/300/300?random=22",
            5500,
        ),
        entry(
            "prod_3",
            "Vacuum Fried Jackfruit Treat - 50 gms",
            "https://picsum.photos/300/300?random=23",
            9900,
        ),
        entry(
            "prod_4",
            "Vacuum Fried Garlic Treat - 40 gms",
            "https://picsum.photos/300/300?random=24",
            13000,
        ),
        entry(
            "prod_5",
            "Chips",
            "https://picsum.photos/400/400?random=25",
            5000,
        ),
        entry(
            "prod_6",
            "Spicy Sticks",
            "https://picsum.photos/400/400?random=26",
            6000,
        ),
        entry(
            "prod_7",
            "Jacksnack Beta",
            "https://picsum.photos/400/600?random=2",
            7999,
        ),
        entry(
            "prod_8",
            "Jacksnack Gamma",
            "https://picsum.photos/400/600?random=3",
            12999,
        ),
    ]
}

/// Seed the product catalog.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a statement
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let repository = ProductRepository::new(&pool);

    let products = catalog();
    let count = products.len();
    for product in &products {
        repository.upsert(product).await?;
        tracing::info!(product_id = %product.id, "Seeded product");
    }

    tracing::info!("Catalog seeded ({count} products)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_unique_ids() {
        let products = catalog();
        let mut ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), products.len());
    }

    #[test]
    fn test_promotional_product_present() {
        let products = catalog();
        let alpha = products
            .iter()
            .find(|p| p.id.as_str() == "prod_1")
            .expect("prod_1 in catalog");
        assert_eq!(alpha.price, Decimal::ONE);
    }
}
