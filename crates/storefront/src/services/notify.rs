//! Best-effort notification dispatch.
//!
//! Notifications run after the order is durably persisted and must never
//! unwind the checkout flow: every failure here is logged and swallowed.
//! Missing configuration disables a channel with a log line, not an error.
//!
//! Channels:
//! - owner email describing the order, sent through the Resend HTTP API
//! - a `wa.me` deep link with a pre-formatted order summary; a server
//!   process cannot open a browser tab, so the link is logged and handed
//!   back in the checkout response for the client to open

use reqwest::header::AUTHORIZATION;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::instrument;

use crate::config::NotificationConfig;
use crate::models::NewOrder;

/// Resend transactional email API endpoint.
const RESEND_URL: &str = "https://api.resend.com/emails";

/// Errors internal to notification dispatch. These never propagate past the
/// dispatch call; they exist so failures log with structure.
#[derive(Debug, thiserror::Error)]
enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Outbound email payload.
#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    html: String,
}

/// Notification dispatcher. Cheap to clone; carries its own HTTP client.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    config: NotificationConfig,
}

impl Notifier {
    /// Create a notifier from channel configuration.
    #[must_use]
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Notify the shop owner about a freshly persisted order. Best-effort:
    /// logs and returns on any failure.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn order_placed(&self, order: &NewOrder) {
        if let Some(link) = self.whatsapp_link(order) {
            tracing::info!(link = %link, "WhatsApp order link ready");
        }

        let (Some(api_key), Some(from), Some(owner)) = (
            self.config.resend_api_key.as_ref(),
            self.config.from_email.as_deref(),
            self.config.owner_email.as_deref(),
        ) else {
            tracing::warn!("Order email not configured; skipping notification");
            return;
        };

        let subject = format!("🛍️ New Order Received: {}", order.item_names());
        let request = EmailRequest {
            from,
            to: owner,
            subject,
            html: order_email_html(order),
        };

        if let Err(e) = self.send_email(api_key.expose_secret(), &request).await {
            tracing::error!(error = %e, "Failed to send order notification email");
        } else {
            tracing::info!(to = %owner, "Order notification email sent");
        }
    }

    /// Auto-response for a contact form submission. Best-effort.
    #[instrument(skip(self, message), fields(to = %email))]
    pub async fn contact_received(&self, name: &str, email: &str, message: &str) {
        let (Some(api_key), Some(from)) = (
            self.config.resend_api_key.as_ref(),
            self.config.from_email.as_deref(),
        ) else {
            tracing::warn!("Contact auto-response not configured; skipping");
            return;
        };

        let request = EmailRequest {
            from,
            to: email,
            subject: "We received your message".to_owned(),
            html: contact_email_html(name, email, message),
        };

        if let Err(e) = self.send_email(api_key.expose_secret(), &request).await {
            tracing::error!(error = %e, "Failed to send contact auto-response");
        }
    }

    /// Build the `wa.me` deep link carrying the order summary, if an owner
    /// number is configured.
    #[must_use]
    pub fn whatsapp_link(&self, order: &NewOrder) -> Option<String> {
        let owner = self.config.whatsapp_owner_number.as_deref()?;

        let products = order
            .items
            .iter()
            .map(|item| format!("{} (x{})", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join(", ");

        let message = [
            "🛍️ *New Order!*".to_owned(),
            format!("*Payment:* {}", order.payment_method.label()),
            format!("*Customer:* {}", order.customer_name),
            format!("*Phone:* {}", order.phone),
            format!("*Product(s):* {products}"),
            format!("*Address:* {}", order.address),
            format!("*Total Amount:* ₹{:.2}", order.amount),
        ]
        .join("\n");

        Some(format!(
            "https://wa.me/{owner}?text={}",
            urlencoding::encode(&message)
        ))
    }

    async fn send_email(
        &self,
        api_key: &str,
        request: &EmailRequest<'_>,
    ) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(RESEND_URL)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// HTML body for the owner's order notification.
fn order_email_html(order: &NewOrder) -> String {
    let rows = order
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>₹{:.2}</td></tr>",
                item.name, item.quantity, item.price
            )
        })
        .collect::<String>();

    let payment_id_line = order.payment_id.as_deref().map_or_else(String::new, |id| {
        format!("<li><strong>Payment ID:</strong> {id}</li>")
    });

    format!(
        r#"<div style="font-family: Arial, sans-serif; line-height: 1.6;">
  <h1>🛍️ New Order Notification</h1>
  <p>You've received a new order. Here are the details:</p>
  <h2>Customer Details</h2>
  <ul>
    <li><strong>Name:</strong> {customer}</li>
    <li><strong>Phone:</strong> {phone}</li>
    <li><strong>Address:</strong> {address}</li>
  </ul>
  <h2>Order Details</h2>
  <table>
    <thead><tr><th>Product</th><th>Quantity</th><th>Price</th></tr></thead>
    <tbody>{rows}</tbody>
  </table>
  <h2>Payment Details</h2>
  <ul>
    <li><strong>Total Amount:</strong> ₹{amount:.2}</li>
    <li><strong>Payment Method:</strong> {method}</li>
    <li><strong>Payment Status:</strong> {status}</li>
    {payment_id_line}
  </ul>
  <p>This is an automated notification from your Jacksnack online store.</p>
</div>"#,
        customer = order.customer_name,
        phone = order.phone,
        address = order.address,
        amount = order.amount,
        method = order.payment_method.label(),
        status = order.payment_status,
    )
}

/// HTML body for the contact form auto-response.
fn contact_email_html(name: &str, email: &str, message: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; line-height: 1.6;">
  <p>Thank you for contacting us, {name}!</p>
  <p>We have received your message:</p>
  <blockquote>{message}</blockquote>
  <p>We will get back to you shortly at {email}.</p>
</div>"#
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jacksnack_core::{PaymentMethod, ProductId};
    use rust_decimal::Decimal;

    use crate::models::{OrderItem, ShippingInfo};

    fn order() -> NewOrder {
        let shipping = ShippingInfo {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            address: "12 MG Road".to_string(),
            apartment: None,
            city: "Bengaluru".to_string(),
            state: "karnataka".to_string(),
            zip: "560001".to_string(),
            phone: "9876543210".to_string(),
            country: "india".to_string(),
        };
        NewOrder::assemble(
            &shipping,
            "asha@example.com",
            vec![OrderItem {
                id: ProductId::new("prod_2"),
                name: "Vacuum Fried Bhindi Treat Mini - 20 gms".to_string(),
                quantity: 2,
                price: Decimal::new(5500, 2),
            }],
            Decimal::new(15_000, 2),
            PaymentMethod::Cod,
            None,
            "attempt-1".to_string(),
        )
    }

    fn notifier_with_number(number: &str) -> Notifier {
        Notifier::new(NotificationConfig {
            whatsapp_owner_number: Some(number.to_string()),
            ..NotificationConfig::default()
        })
    }

    #[test]
    fn test_whatsapp_link_requires_configured_number() {
        let notifier = Notifier::new(NotificationConfig::default());
        assert!(notifier.whatsapp_link(&order()).is_none());
    }

    #[test]
    fn test_whatsapp_link_format() {
        let link = notifier_with_number("918123363394")
            .whatsapp_link(&order())
            .unwrap();
        assert!(link.starts_with("https://wa.me/918123363394?text="));

        let text = urlencoding::decode(link.split("text=").nth(1).unwrap())
            .unwrap()
            .into_owned();
        assert!(text.contains("🛍️ *New Order!*"));
        assert!(text.contains("*Payment:* COD"));
        assert!(text.contains("*Customer:* Asha Rao"));
        assert!(text.contains("Vacuum Fried Bhindi Treat Mini - 20 gms (x2)"));
        assert!(text.contains("*Total Amount:* ₹150.00"));
    }

    #[test]
    fn test_order_email_lists_items_and_payment() {
        let html = order_email_html(&order());
        assert!(html.contains("Vacuum Fried Bhindi Treat Mini - 20 gms"));
        assert!(html.contains("₹150.00"));
        assert!(html.contains("COD"));
        // No gateway reference on a COD order
        assert!(!html.contains("Payment ID"));
    }

    #[test]
    fn test_order_email_includes_payment_id_when_present() {
        let paid = order().with_payment_id("pay_ABC123".to_string());
        let html = order_email_html(&paid);
        assert!(html.contains("Payment ID"));
        assert!(html.contains("pay_ABC123"));
    }

    #[test]
    fn test_contact_email_uses_template() {
        let html = contact_email_html("Ravi", "ravi@example.com", "Where is my order?");
        assert!(html.contains("Thank you for contacting us, Ravi!"));
        assert!(html.contains("Where is my order?"));
        assert!(html.contains("ravi@example.com"));
    }
}
