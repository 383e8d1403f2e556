//! Razorpay Payment Links API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` with basic auth (key id / key secret)
//! - The gateway hosts the actual payment UI; this service only creates a
//!   payment link and later receives the outcome on a callback route
//! - Three observable outcomes per attempt: success (a payment reference id
//!   arrives on the callback, exactly once), cancellation (the customer
//!   dismisses the gateway page), and unavailability (missing credentials,
//!   surfaced before anything else happens)
//!
//! No retry policy: a failed or abandoned payment simply leaves the pending
//! attempt to expire, and nothing has been persisted yet.

mod types;

pub use types::{LinkCustomer, PaymentLink, PaymentLinkRequest};

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::RazorpayConfig;

/// Razorpay REST API base URL.
const BASE_URL: &str = "https://api.razorpay.com/v1";

/// Errors that can occur when interacting with the Razorpay API.
#[derive(Debug, thiserror::Error)]
pub enum RazorpayError {
    /// Gateway credentials are not configured; online payment is unavailable.
    #[error("Razorpay credentials are not configured")]
    NotConfigured,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the Razorpay Payment Links API.
#[derive(Clone)]
pub struct RazorpayClient {
    client: reqwest::Client,
    key_id: String,
    key_secret: SecretString,
}

impl std::fmt::Debug for RazorpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayClient")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RazorpayClient {
    /// Create a new Razorpay client from gateway credentials.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    /// The public key id, safe to hand to browsers.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a hosted payment link for a checkout attempt.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the gateway rejects it.
    #[instrument(skip(self, request), fields(amount = request.amount))]
    pub async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLink, RazorpayError> {
        let response = self
            .client
            .post(format!("{BASE_URL}/payment_links"))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<PaymentLink>()
            .await
            .map_err(|e| RazorpayError::Parse(e.to_string()))
    }
}
