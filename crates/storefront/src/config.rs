//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars)
//!
//! ## Payment gateway (both required for online payment; without them the
//! gateway is reported unavailable and only cash-on-delivery works)
//! - `RAZORPAY_KEY_ID` - API key id
//! - `RAZORPAY_KEY_SECRET` - API key secret
//!
//! ## Notifications (all optional; missing values log + skip that channel)
//! - `RESEND_API_KEY` - Transactional email API key
//! - `FROM_EMAIL` - Sender address for outbound email
//! - `OWNER_EMAIL` - Recipient for new-order notifications
//! - `WHATSAPP_OWNER_NUMBER` - Owner number for the wa.me deep link
//!
//! ## Pricing
//! - `PROMO_PRODUCT_ID` - Promotional product id (default: prod_1)
//! - `PROMO_OVERRIDE_AMOUNT` - Flat fee replacing that line's subtotal
//!   contribution and the shipping fee (default: 1.00)
//! - `FLAT_SHIPPING_FEE` - Standard shipping fee (default: 40.00)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use jacksnack_core::ProductId;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront (payment callbacks are built on it)
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Payment gateway credentials; `None` means online payment is unavailable
    pub razorpay: Option<RazorpayConfig>,
    /// Notification channel configuration
    pub notifications: NotificationConfig,
    /// Promotional pricing rule
    pub promo: PromoPricing,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Razorpay payment-links API configuration.
///
/// Implements `Debug` manually to redact the key secret.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// API key id (safe to expose to the browser)
    pub key_id: String,
    /// API key secret (server-side only)
    pub key_secret: SecretString,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .finish()
    }
}

/// Notification channel configuration.
///
/// Every field is optional: a missing value disables that channel with a log
/// line, never an error, because notifications are best-effort.
#[derive(Clone, Default)]
pub struct NotificationConfig {
    /// Transactional email API key
    pub resend_api_key: Option<SecretString>,
    /// Sender address for outbound email
    pub from_email: Option<String>,
    /// Recipient for new-order notifications
    pub owner_email: Option<String>,
    /// Owner number for the WhatsApp deep link (digits, country code first)
    pub whatsapp_owner_number: Option<String>,
}

impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field(
                "resend_api_key",
                &self.resend_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("from_email", &self.from_email)
            .field("owner_email", &self.owner_email)
            .field("whatsapp_owner_number", &self.whatsapp_owner_number)
            .finish()
    }
}

/// The promotional flat-fee pricing rule.
///
/// When the designated product is in the cart, its line contributes
/// `override_amount` to the subtotal (regardless of quantity or list price)
/// and shipping is charged at `override_amount` instead of the flat fee.
/// One configured rule serves every checkout surface.
#[derive(Debug, Clone)]
pub struct PromoPricing {
    /// The product id that triggers the override
    pub product_id: ProductId,
    /// Flat fee replacing the line contribution and the shipping fee
    pub override_amount: Decimal,
    /// Standard shipping fee for carts without the promotional product
    pub flat_shipping_fee: Decimal,
}

impl Default for PromoPricing {
    fn default() -> Self {
        Self {
            product_id: ProductId::new("prod_1"),
            override_amount: Decimal::new(100, 2),
            flat_shipping_fee: Decimal::new(4000, 2),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;
        let session_secret = get_required_secret("STOREFRONT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "STOREFRONT_SESSION_SECRET")?;

        let razorpay = RazorpayConfig::from_env();
        let notifications = NotificationConfig::from_env();
        let promo = PromoPricing::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            razorpay,
            notifications,
            promo,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RazorpayConfig {
    /// Load the gateway key pair. Returns `None` unless both halves are set;
    /// a half-configured gateway is treated as absent so the failure mode is
    /// "payment unavailable" rather than mid-checkout authentication errors.
    fn from_env() -> Option<Self> {
        let key_id = get_optional_env("RAZORPAY_KEY_ID")?;
        let key_secret = get_optional_env("RAZORPAY_KEY_SECRET")?;
        Some(Self {
            key_id,
            key_secret: SecretString::from(key_secret),
        })
    }
}

impl NotificationConfig {
    fn from_env() -> Self {
        Self {
            resend_api_key: get_optional_env("RESEND_API_KEY").map(SecretString::from),
            from_email: get_optional_env("FROM_EMAIL"),
            owner_email: get_optional_env("OWNER_EMAIL"),
            whatsapp_owner_number: get_optional_env("WHATSAPP_OWNER_NUMBER"),
        }
    }

    /// True when the email channel has everything it needs.
    #[must_use]
    pub const fn email_configured(&self) -> bool {
        self.resend_api_key.is_some() && self.from_email.is_some() && self.owner_email.is_some()
    }
}

impl PromoPricing {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let product_id = get_optional_env("PROMO_PRODUCT_ID")
            .map_or(defaults.product_id, ProductId::new);
        let override_amount =
            get_decimal_or("PROMO_OVERRIDE_AMOUNT", defaults.override_amount)?;
        let flat_shipping_fee =
            get_decimal_or("FLAT_SHIPPING_FEE", defaults.flat_shipping_fee)?;

        Ok(Self {
            product_id,
            override_amount,
            flat_shipping_fee,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a decimal environment variable, falling back to a default.
fn get_decimal_or(key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => Decimal::from_str(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_validate_session_secret_valid_length() {
        let secret = SecretString::from("x".repeat(32));
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_promo_defaults_match_catalog() {
        let promo = PromoPricing::default();
        assert_eq!(promo.product_id.as_str(), "prod_1");
        assert_eq!(promo.override_amount, Decimal::ONE);
        assert_eq!(promo.flat_shipping_fee, Decimal::new(40, 0));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            razorpay: None,
            notifications: NotificationConfig::default(),
            promo: PromoPricing::default(),
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_razorpay_config_debug_redacts_secret() {
        let config = RazorpayConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: SecretString::from("super_secret_value"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("rzp_test_key"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_value"));
    }

    #[test]
    fn test_notification_config_email_configured() {
        let mut config = NotificationConfig::default();
        assert!(!config.email_configured());

        config.resend_api_key = Some(SecretString::from("re_key"));
        config.from_email = Some("orders@jacksnack.in".to_string());
        config.owner_email = Some("owner@jacksnack.in".to_string());
        assert!(config.email_configured());
    }
}
