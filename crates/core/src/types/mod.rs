//! Shared newtype wrappers and enums.

pub mod email;
pub mod id;
pub mod payment;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{AttemptId, OrderId, ProductId, UserId};
pub use payment::{OrderStatus, PaymentMethod, PaymentStatus, StatusParseError};
pub use price::{CurrencyCode, Price};
