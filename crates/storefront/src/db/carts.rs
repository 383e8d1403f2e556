//! Cart line repository.
//!
//! All statements are scoped to a single user. The two operations the
//! consistency model depends on are single statements: the add path is an
//! atomic upsert-increment, and clearing a cart is one `DELETE` for the whole
//! line set rather than a delete per line.

use chrono::{DateTime, Utc};
use jacksnack_core::{ProductId, UserId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{CartLine, Product};

/// Row shape for cart queries.
#[derive(sqlx::FromRow)]
struct CartLineRow {
    product_id: String,
    name: String,
    image_url: String,
    price: Decimal,
    quantity: i32,
    added_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            name: row.name,
            image_url: row.image_url,
            price: row.price,
            quantity: row.quantity,
            added_at: row.added_at,
        }
    }
}

/// Repository for per-user cart lines.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a line for the product, or atomically increment the existing
    /// line's quantity. Catalog attributes are denormalized into the row so
    /// the cart reads without a join.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert_line(
        &self,
        user_id: UserId,
        product: &Product,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (user_id, product_id, name, image_url, price, quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            ",
        )
        .bind(user_id)
        .bind(product.id.as_str())
        .bind(&product.name)
        .bind(&product.image_url)
        .bind(product.price)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete a line. Deleting an absent line is a no-op, so removal is
    /// idempotent from the caller's point of view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn remove_line(
        &self,
        user_id: UserId,
        product_id: &ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id.as_str())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Remove every line for the user in one statement. Either the whole
    /// cart clears or none of it does; there is no partially-cleared state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Current line set for the user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(
            r"
            SELECT product_id, name, image_url, price, quantity, added_at
            FROM cart_items
            WHERE user_id = $1
            ORDER BY added_at, product_id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }
}
