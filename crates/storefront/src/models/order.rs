//! Order models and the canonical order assembler.
//!
//! Every checkout surface (cart checkout, single-product buy-now) builds its
//! order through [`NewOrder::assemble`]; there is exactly one place where
//! shipping input, line items and payment state are merged into an order.

use chrono::{DateTime, Utc};
use jacksnack_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A denormalized line item copied into the order at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub id: ProductId,
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// Shipping input collected at checkout. Transient: merged into the order's
/// flattened address, never persisted on its own.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(default)]
    pub apartment: Option<String>,
    pub city: String,
    #[serde(default = "default_state")]
    pub state: String,
    pub zip: String,
    pub phone: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_state() -> String {
    "karnataka".to_string()
}

fn default_country() -> String {
    "india".to_string()
}

/// A shipping field failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field} is required")]
pub struct MissingField {
    /// Name of the empty required field.
    pub field: &'static str,
}

impl ShippingInfo {
    /// Check that every required field is non-empty (after trimming).
    ///
    /// Apartment is the only optional field. Runs before any I/O so a
    /// validation failure leaves no partial state anywhere.
    ///
    /// # Errors
    ///
    /// Returns the first empty required field.
    pub fn validate(&self) -> Result<(), MissingField> {
        let required: [(&'static str, &str); 7] = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
            ("phone", &self.phone),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(MissingField { field });
            }
        }
        Ok(())
    }

    /// Flatten the address into a single comma-joined string, dropping empty
    /// optional segments.
    #[must_use]
    pub fn flattened_address(&self) -> String {
        [
            self.address.as_str(),
            self.apartment.as_deref().unwrap_or(""),
            self.city.as_str(),
            self.state.as_str(),
            self.zip.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// The customer's display name.
    #[must_use]
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// An order ready to persist. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub id: OrderId,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub items: Vec<OrderItem>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub order_status: OrderStatus,
    pub tracking_id: String,
    pub idempotency_key: String,
}

impl NewOrder {
    /// Merge shipping input, line items and payment state into an order.
    ///
    /// Status precedence: a gateway payment reference always means `paid`;
    /// otherwise cash-on-delivery means `cod`; otherwise the order is still
    /// `pending` (a gateway order awaiting its callback).
    #[must_use]
    pub fn assemble(
        shipping: &ShippingInfo,
        email: &str,
        items: Vec<OrderItem>,
        amount: Decimal,
        payment_method: PaymentMethod,
        payment_id: Option<String>,
        idempotency_key: String,
    ) -> Self {
        let payment_status = if payment_id.is_some() {
            PaymentStatus::Paid
        } else if payment_method == PaymentMethod::Cod {
            PaymentStatus::Cod
        } else {
            PaymentStatus::Pending
        };

        Self {
            id: OrderId::generate(),
            customer_name: shipping.customer_name(),
            email: email.to_string(),
            phone: shipping.phone.trim().to_string(),
            address: shipping.flattened_address(),
            items,
            amount,
            payment_method,
            payment_status,
            payment_id,
            order_status: OrderStatus::Placed,
            tracking_id: String::new(),
            idempotency_key,
        }
    }

    /// Attach a gateway payment reference, marking the order paid.
    #[must_use]
    pub fn with_payment_id(mut self, payment_id: String) -> Self {
        self.payment_id = Some(payment_id);
        self.payment_status = PaymentStatus::Paid;
        self
    }

    /// Comma-joined product names, used in gateway descriptions and
    /// notification subjects.
    #[must_use]
    pub fn item_names(&self) -> String {
        self.items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A persisted order as read back from the database.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub items: Vec<OrderItem>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub order_status: OrderStatus,
    pub tracking_id: String,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            address: "12 MG Road".to_string(),
            apartment: None,
            city: "Bengaluru".to_string(),
            state: "karnataka".to_string(),
            zip: "560001".to_string(),
            phone: "9876543210".to_string(),
            country: "india".to_string(),
        }
    }

    fn items() -> Vec<OrderItem> {
        vec![OrderItem {
            id: ProductId::new("prod_2"),
            name: "Vacuum Fried Bhindi Treat Mini - 20 gms".to_string(),
            quantity: 1,
            price: Decimal::new(5500, 2),
        }]
    }

    #[test]
    fn test_validate_rejects_blank_required_field() {
        let mut info = shipping();
        info.city = "  ".to_string();
        assert_eq!(info.validate().unwrap_err().field, "city");
    }

    #[test]
    fn test_validate_allows_missing_apartment() {
        assert!(shipping().validate().is_ok());
    }

    #[test]
    fn test_flattened_address_skips_empty_segments() {
        let info = shipping();
        assert_eq!(
            info.flattened_address(),
            "12 MG Road, Bengaluru, karnataka, 560001, india"
        );

        let mut with_apartment = shipping();
        with_apartment.apartment = Some("Flat 4B".to_string());
        assert_eq!(
            with_apartment.flattened_address(),
            "12 MG Road, Flat 4B, Bengaluru, karnataka, 560001, india"
        );
    }

    #[test]
    fn test_assemble_cod_status() {
        let order = NewOrder::assemble(
            &shipping(),
            "asha@example.com",
            items(),
            Decimal::new(9500, 2),
            PaymentMethod::Cod,
            None,
            "attempt-1".to_string(),
        );
        assert_eq!(order.payment_status, PaymentStatus::Cod);
        assert!(order.payment_id.is_none());
        assert_eq!(order.order_status, OrderStatus::Placed);
        assert_eq!(order.tracking_id, "");
    }

    #[test]
    fn test_assemble_pending_then_paid() {
        let order = NewOrder::assemble(
            &shipping(),
            "asha@example.com",
            items(),
            Decimal::new(9500, 2),
            PaymentMethod::Razorpay,
            None,
            "attempt-2".to_string(),
        );
        assert_eq!(order.payment_status, PaymentStatus::Pending);

        let paid = order.with_payment_id("pay_ABC123".to_string());
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payment_id.as_deref(), Some("pay_ABC123"));
    }

    #[test]
    fn test_payment_reference_wins_over_method() {
        let order = NewOrder::assemble(
            &shipping(),
            "asha@example.com",
            items(),
            Decimal::new(9500, 2),
            PaymentMethod::Cod,
            Some("pay_XYZ".to_string()),
            "attempt-3".to_string(),
        );
        assert_eq!(order.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_customer_name_concatenation() {
        let order = NewOrder::assemble(
            &shipping(),
            "asha@example.com",
            items(),
            Decimal::ZERO,
            PaymentMethod::Cod,
            None,
            "attempt-4".to_string(),
        );
        assert_eq!(order.customer_name, "Asha Rao");
    }

    #[test]
    fn test_persisted_amount_matches_recomputed_totals() {
        use crate::config::PromoPricing;
        use crate::pricing;

        let promo = PromoPricing::default();
        let order_items = vec![
            OrderItem {
                id: ProductId::new("prod_1"),
                name: "Jacksnack Alpha".to_string(),
                quantity: 5,
                price: Decimal::ONE,
            },
            OrderItem {
                id: ProductId::new("prod_4"),
                name: "Vacuum Fried Garlic Treat - 40 gms".to_string(),
                quantity: 2,
                price: Decimal::new(13_000, 2),
            },
        ];

        let totals = pricing::quote(&promo, &order_items);
        let order = NewOrder::assemble(
            &shipping(),
            "asha@example.com",
            order_items,
            totals.total,
            PaymentMethod::Cod,
            None,
            "attempt-rt".to_string(),
        );

        // Re-running the calculator over the order's denormalized items must
        // reproduce the persisted amount.
        let recomputed = pricing::quote(&promo, &order.items);
        assert_eq!(recomputed.total, order.amount);
    }

    #[test]
    fn test_item_names_joined() {
        let mut order_items = items();
        order_items.push(OrderItem {
            id: ProductId::new("prod_5"),
            name: "Chips".to_string(),
            quantity: 2,
            price: Decimal::new(5000, 2),
        });
        let order = NewOrder::assemble(
            &shipping(),
            "asha@example.com",
            order_items,
            Decimal::ZERO,
            PaymentMethod::Cod,
            None,
            "attempt-5".to_string(),
        );
        assert_eq!(
            order.item_names(),
            "Vacuum Fried Bhindi Treat Mini - 20 gms, Chips"
        );
    }
}
