//! Payment and order status enums.
//!
//! Statuses are persisted as lowercase text; `FromStr`/`as_str` are the
//! single conversion point so repositories can round-trip rows without a
//! database-side enum type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a persisted status string is not recognized.
#[derive(Debug, Error, Clone)]
#[error("unknown {kind} value: {value}")]
pub struct StatusParseError {
    /// Which enum failed to parse.
    pub kind: &'static str,
    /// The offending value.
    pub value: String,
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Online payment through the Razorpay gateway (UPI, cards, netbanking).
    #[default]
    Razorpay,
    /// Cash on delivery; settlement happens outside the system.
    Cod,
}

impl PaymentMethod {
    /// Persisted / wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Razorpay => "razorpay",
            Self::Cod => "cod",
        }
    }

    /// Human-facing label used in notifications.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Razorpay => "Razorpay",
            Self::Cod => "COD",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "razorpay" => Ok(Self::Razorpay),
            // Historical rows carry the uppercase label
            "cod" | "COD" => Ok(Self::Cod),
            other => Err(StatusParseError {
                kind: "payment method",
                value: other.to_owned(),
            }),
        }
    }
}

/// Settlement state of an order.
///
/// `Cod` is terminal at creation time: the order is placed without a gateway
/// reference and collected on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Cod,
}

impl PaymentStatus {
    /// Persisted / wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cod => "cod",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "cod" => Ok(Self::Cod),
            other => Err(StatusParseError {
                kind: "payment status",
                value: other.to_owned(),
            }),
        }
    }
}

/// Fulfilment state of an order. Orders are created as `Placed`; the later
/// states exist for the fulfilment tooling that updates tracking ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Placed,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// Persisted / wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placed" => Ok(Self::Placed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            other => Err(StatusParseError {
                kind: "order status",
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_roundtrip() {
        for method in [PaymentMethod::Razorpay, PaymentMethod::Cod] {
            let parsed: PaymentMethod = method.as_str().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn test_payment_method_accepts_legacy_uppercase_cod() {
        let parsed: PaymentMethod = "COD".parse().unwrap();
        assert_eq!(parsed, PaymentMethod::Cod);
    }

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Cod,
        ] {
            let parsed: PaymentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = "refunded".parse::<PaymentStatus>().unwrap_err();
        assert_eq!(err.value, "refunded");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
        let json = serde_json::to_string(&PaymentMethod::Cod).unwrap();
        assert_eq!(json, "\"cod\"");
    }

    #[test]
    fn test_labels() {
        assert_eq!(PaymentMethod::Cod.label(), "COD");
        assert_eq!(PaymentMethod::Razorpay.label(), "Razorpay");
    }
}
