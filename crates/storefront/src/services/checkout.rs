//! Checkout orchestration.
//!
//! Sequencing is the consistency mechanism: nothing durable is written until
//! payment is confirmed (or cash-on-delivery is chosen), so a cancelled or
//! failed payment needs no compensation - the pending attempt just expires.
//!
//! ```text
//! validate -> quote -> assemble draft
//!     cod:      persist -> notify (spawned) -> clear cart
//!     gateway:  create payment link -> park draft in TTL cache
//!                  callback:  claim draft (single removal) -> persist -> ...
//!                  cancel:    drop draft, log, done
//! ```
//!
//! Double submission is handled by the order's idempotency key, not a UI busy
//! flag: the orders table is unique on the key, and a duplicate insert hands
//! back the order the first submission created.

use std::time::Duration;

use jacksnack_core::{AttemptId, CurrencyCode, PaymentMethod, Price, ProductId, UserId};
use moka::future::Cache;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::PromoPricing;
use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{CartLine, NewOrder, OrderItem, ShippingInfo};
use crate::pricing;
use crate::razorpay::{LinkCustomer, PaymentLinkRequest, RazorpayClient};
use crate::services::{CartService, Notifier};

/// How long an unconfirmed gateway attempt is kept before it expires.
const PENDING_ATTEMPT_TTL: Duration = Duration::from_secs(30 * 60);

/// A checkout attempt awaiting gateway confirmation. Lives only in the cache;
/// nothing durable exists until the callback claims it.
#[derive(Clone)]
struct PendingCheckout {
    order: NewOrder,
    user_id: Option<UserId>,
}

/// A successfully placed order, as reported to the client.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrder {
    pub order_id: jacksnack_core::OrderId,
    pub amount: Decimal,
    pub payment_status: jacksnack_core::PaymentStatus,
    /// Pre-formatted owner WhatsApp link for the client to open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
}

/// Result of a checkout submission.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    /// The order is durably persisted.
    Placed(PlacedOrder),
    /// The customer must complete payment at the gateway first.
    PaymentRequired {
        attempt_id: AttemptId,
        payment_url: String,
    },
}

/// Checkout service: validation, pricing, payment sequencing, persistence
/// and notification dispatch.
#[derive(Clone)]
pub struct CheckoutService {
    pool: PgPool,
    promo: PromoPricing,
    base_url: String,
    razorpay: Option<RazorpayClient>,
    carts: CartService,
    notifier: Notifier,
    pending: Cache<String, PendingCheckout>,
}

impl CheckoutService {
    /// Create a checkout service with its collaborators injected.
    #[must_use]
    pub fn new(
        pool: PgPool,
        promo: PromoPricing,
        base_url: String,
        razorpay: Option<RazorpayClient>,
        carts: CartService,
        notifier: Notifier,
    ) -> Self {
        Self {
            pool,
            promo,
            base_url,
            razorpay,
            carts,
            notifier,
            pending: Cache::builder().time_to_live(PENDING_ATTEMPT_TTL).build(),
        }
    }

    /// Check out the signed-in user's whole cart.
    ///
    /// # Errors
    ///
    /// `Validation` for bad shipping input or an empty cart, database and
    /// gateway errors per [`AppError`].
    #[instrument(skip(self, shipping), fields(user_id = %user_id))]
    pub async fn checkout_cart(
        &self,
        user_id: UserId,
        email: &str,
        shipping: &ShippingInfo,
        payment_method: PaymentMethod,
        idempotency_key: Option<String>,
    ) -> Result<CheckoutOutcome> {
        shipping
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let lines = self.carts.items(user_id).await?;
        if lines.is_empty() {
            return Err(AppError::Validation("Your cart is empty.".to_owned()));
        }
        let items = lines.iter().map(OrderItem::from).collect();

        self.start(items, email, Some(user_id), shipping, payment_method, idempotency_key)
            .await
    }

    /// Buy a single product (quantity 1) without touching the cart.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown product; otherwise as
    /// [`Self::checkout_cart`].
    #[instrument(skip(self, shipping), fields(product_id = %product_id))]
    pub async fn buy_now(
        &self,
        product_id: &ProductId,
        email: &str,
        shipping: &ShippingInfo,
        payment_method: PaymentMethod,
        idempotency_key: Option<String>,
    ) -> Result<CheckoutOutcome> {
        shipping
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let product = ProductRepository::new(&self.pool)
            .get(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

        let items = vec![OrderItem {
            id: product.id,
            name: product.name,
            quantity: 1,
            price: product.price,
        }];

        self.start(items, email, None, shipping, payment_method, idempotency_key)
            .await
    }

    /// The gateway confirmed payment for an attempt: claim the parked draft
    /// and make it durable. Claiming is a single cache removal, so a replayed
    /// callback finds nothing and cannot create a second order.
    ///
    /// # Errors
    ///
    /// `NotFound` if the attempt is unknown, expired, or already finalized.
    #[instrument(skip(self))]
    pub async fn confirm_payment(
        &self,
        attempt_id: &str,
        payment_id: &str,
    ) -> Result<PlacedOrder> {
        let pending = self
            .pending
            .remove(attempt_id)
            .await
            .ok_or_else(|| AppError::NotFound("checkout attempt".to_owned()))?;

        let order = pending.order.with_payment_id(payment_id.to_owned());
        self.finalize(order, pending.user_id).await
    }

    /// The customer dismissed the gateway page. Drops the pending attempt if
    /// it is still there; not an error either way, and nothing was persisted.
    #[instrument(skip(self))]
    pub async fn cancel_payment(&self, attempt_id: &str) {
        if self.pending.remove(attempt_id).await.is_some() {
            tracing::info!(attempt_id, "Payment cancelled by customer");
        } else {
            tracing::info!(attempt_id, "Cancel for unknown or finished attempt");
        }
    }

    async fn start(
        &self,
        items: Vec<OrderItem>,
        email: &str,
        user_id: Option<UserId>,
        shipping: &ShippingInfo,
        payment_method: PaymentMethod,
        idempotency_key: Option<String>,
    ) -> Result<CheckoutOutcome> {
        let totals = pricing::quote(&self.promo, &items);
        let key = idempotency_key.unwrap_or_else(|| Uuid::new_v4().to_string());
        let order = NewOrder::assemble(
            shipping,
            email,
            items,
            totals.total,
            payment_method,
            None,
            key,
        );

        match payment_method {
            PaymentMethod::Cod => {
                let placed = self.finalize(order, user_id).await?;
                Ok(CheckoutOutcome::Placed(placed))
            }
            PaymentMethod::Razorpay => {
                // Fail fast when the gateway is not configured, before any
                // attempt state exists. This is unavailability, not a
                // cancellation, and callers show a different message.
                let client = self.razorpay.as_ref().ok_or(AppError::PaymentUnavailable)?;

                let attempt_id = AttemptId::new(Uuid::new_v4().to_string());
                let amount = Price::new(order.amount, CurrencyCode::INR);
                let request = PaymentLinkRequest::new(
                    amount.minor_units(),
                    CurrencyCode::INR.code(),
                    format!("Order for {}", order.item_names()),
                    LinkCustomer {
                        name: order.customer_name.clone(),
                        contact: order.phone.clone(),
                    },
                    format!(
                        "{}/payments/callback?attempt={}",
                        self.base_url.trim_end_matches('/'),
                        attempt_id
                    ),
                );

                let link = client.create_payment_link(&request).await?;

                self.pending
                    .insert(
                        attempt_id.as_str().to_owned(),
                        PendingCheckout { order, user_id },
                    )
                    .await;

                Ok(CheckoutOutcome::PaymentRequired {
                    attempt_id,
                    payment_url: link.short_url,
                })
            }
        }
    }

    /// Persist the order, then run the non-critical tail: notification
    /// dispatch (spawned, best-effort) and cart clearing. Failures after the
    /// insert never take back the "order placed" outcome.
    async fn finalize(
        &self,
        order: NewOrder,
        user_id: Option<UserId>,
    ) -> Result<PlacedOrder> {
        let order_id = OrderRepository::new(&self.pool).insert(&order).await?;

        let whatsapp_url = self.notifier.whatsapp_link(&order);

        // A reused idempotency key resolves to the order a previous
        // submission created; its notification and cart clear already ran.
        if order_id != order.id {
            return Ok(PlacedOrder {
                order_id,
                amount: order.amount,
                payment_status: order.payment_status,
                whatsapp_url,
            });
        }

        let notifier = self.notifier.clone();
        let notify_order = order.clone();
        tokio::spawn(async move {
            notifier.order_placed(&notify_order).await;
        });

        if let Some(user_id) = user_id {
            if let Err(e) = self.carts.clear(user_id).await {
                tracing::warn!(error = %e, %user_id, "Cart clear failed after order was placed");
            }
        }

        Ok(PlacedOrder {
            order_id,
            amount: order.amount,
            payment_status: order.payment_status,
            whatsapp_url,
        })
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product_id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.price,
        }
    }
}
