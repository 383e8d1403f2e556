//! Order total calculation.
//!
//! This is the only place totals are computed; every checkout surface calls
//! [`quote`] so the promotional override cannot drift between call sites.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::PromoPricing;
use crate::models::OrderItem;

/// Computed totals for a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Compute subtotal, shipping and total for a line-item set.
///
/// Standard lines contribute price × quantity. A line whose product id
/// matches the configured promotional product instead contributes the flat
/// override amount, independent of its quantity or list price, and its
/// presence also replaces the shipping fee with the same override amount.
#[must_use]
pub fn quote(promo: &PromoPricing, items: &[OrderItem]) -> Totals {
    let mut subtotal = Decimal::ZERO;
    let mut has_promo = false;

    for item in items {
        if item.id == promo.product_id {
            has_promo = true;
            subtotal += promo.override_amount;
        } else {
            subtotal += item.price * Decimal::from(item.quantity);
        }
    }

    let shipping = if has_promo {
        promo.override_amount
    } else {
        promo.flat_shipping_fee
    };

    Totals {
        subtotal,
        shipping,
        total: subtotal + shipping,
    }
}
