//! Order repository.
//!
//! Orders are append-only: this module exposes insert and read, nothing else.
//! The unique idempotency key turns a duplicate submission into a read of the
//! order the first submission created.

use chrono::{DateTime, Utc};
use jacksnack_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RepositoryError, is_unique_violation};
use crate::models::{NewOrder, Order, OrderItem};

/// Row shape for order queries.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_name: String,
    email: String,
    phone: String,
    address: String,
    items: serde_json::Value,
    amount: Decimal,
    payment_method: String,
    payment_status: String,
    payment_id: Option<String>,
    order_status: String,
    tracking_id: String,
    idempotency_key: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderItem> = serde_json::from_value(row.items)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid order items: {e}")))?;
        let payment_method: PaymentMethod = row.payment_method.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment method in database: {e}"))
        })?;
        let payment_status: PaymentStatus = row.payment_status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;
        let order_status: OrderStatus = row.order_status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            customer_name: row.customer_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            items,
            amount: row.amount,
            payment_method,
            payment_status,
            payment_id: row.payment_id,
            order_status,
            tracking_id: row.tracking_id,
            idempotency_key: row.idempotency_key,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = r"
    SELECT id, customer_name, email, phone, address, items, amount,
           payment_method, payment_status, payment_id, order_status,
           tracking_id, idempotency_key, created_at
    FROM orders
";

/// Repository for the append-only order log.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order. Exactly one row exists per idempotency key: if the
    /// key was already used, the previously created order's id is returned
    /// and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::PermissionDenied` if access rules reject the
    /// write, `RepositoryError::Database` for other failures.
    pub async fn insert(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let items = serde_json::to_value(&order.items)
            .map_err(|e| RepositoryError::DataCorruption(format!("unserializable items: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO orders (
                id, customer_name, email, phone, address, items, amount,
                payment_method, payment_status, payment_id, order_status,
                tracking_id, idempotency_key
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(order.id.as_uuid())
        .bind(&order.customer_name)
        .bind(&order.email)
        .bind(&order.phone)
        .bind(&order.address)
        .bind(items)
        .bind(order.amount)
        .bind(order.payment_method.as_str())
        .bind(order.payment_status.as_str())
        .bind(&order.payment_id)
        .bind(order.order_status.as_str())
        .bind(&order.tracking_id)
        .bind(&order.idempotency_key)
        .execute(self.pool)
        .await;

        match result {
            Ok(_) => Ok(order.id),
            Err(e) if is_unique_violation(&e) => {
                // A concurrent or retried submission already created the
                // order; hand back the existing row's id.
                let existing = self
                    .get_by_idempotency_key(&order.idempotency_key)
                    .await?
                    .ok_or(RepositoryError::Conflict(
                        "duplicate idempotency key but no existing order".to_owned(),
                    ))?;
                Ok(existing.id)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Get an order by its idempotency key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn get_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE idempotency_key = $1"))
                .bind(key)
                .fetch_optional(self.pool)
                .await?;

        row.map(Order::try_from).transpose()
    }
}
