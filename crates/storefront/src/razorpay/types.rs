//! Request and response types for the Razorpay Payment Links API.

use serde::{Deserialize, Serialize};

/// Customer prefill for a payment link.
#[derive(Debug, Clone, Serialize)]
pub struct LinkCustomer {
    pub name: String,
    pub contact: String,
}

/// Notification preferences on the link (sent by the gateway, not us).
#[derive(Debug, Clone, Serialize)]
pub struct LinkNotify {
    pub sms: bool,
    pub email: bool,
}

/// Request body for creating a payment link.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentLinkRequest {
    /// Amount in the smallest currency unit (paise for INR).
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    pub accept_partial: bool,
    pub description: String,
    pub customer: LinkCustomer,
    pub notify: LinkNotify,
    pub reminder_enable: bool,
    /// Where the gateway redirects after the customer pays; the payment
    /// reference id arrives as query parameters on this URL.
    pub callback_url: String,
    pub callback_method: String,
}

impl PaymentLinkRequest {
    /// Build a link request with the defaults this store uses.
    #[must_use]
    pub fn new(
        amount_minor_units: i64,
        currency: &str,
        description: String,
        customer: LinkCustomer,
        callback_url: String,
    ) -> Self {
        Self {
            amount: amount_minor_units,
            currency: currency.to_owned(),
            accept_partial: false,
            description,
            customer,
            notify: LinkNotify {
                sms: true,
                email: false,
            },
            reminder_enable: true,
            callback_url,
            callback_method: "get".to_owned(),
        }
    }
}

/// A created payment link.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLink {
    /// Gateway id of the link (`plink_...`).
    pub id: String,
    /// Hosted checkout URL to send the customer to.
    pub short_url: String,
    /// Link status as reported by the gateway (`created`, `paid`, ...).
    pub status: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_gateway_fields() {
        let request = PaymentLinkRequest::new(
            9500,
            "INR",
            "Order for Vacuum Fried Bhindi Treat Mini - 20 gms".to_string(),
            LinkCustomer {
                name: "Asha Rao".to_string(),
                contact: "9876543210".to_string(),
            },
            "https://jacksnack.in/payments/callback?attempt=a1".to_string(),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["amount"], 9500);
        assert_eq!(json["currency"], "INR");
        assert_eq!(json["accept_partial"], false);
        assert_eq!(json["callback_method"], "get");
        assert_eq!(json["customer"]["contact"], "9876543210");
        assert_eq!(json["notify"]["sms"], true);
    }

    #[test]
    fn test_payment_link_deserializes() {
        let body = r#"{
            "id": "plink_00000000000001",
            "short_url": "https://rzp.io/i/abc123",
            "status": "created",
            "amount": 9500
        }"#;
        let link: PaymentLink = serde_json::from_str(body).unwrap();
        assert_eq!(link.id, "plink_00000000000001");
        assert_eq!(link.short_url, "https://rzp.io/i/abc123");
        assert_eq!(link.status, "created");
    }
}
