//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Per-user cart store with live snapshot fan-out
//! - `checkout` - Order assembly, payment sequencing, persistence
//! - `notify` - Best-effort order and contact notifications
//!
//! All services are constructed once in `main` with their dependencies
//! injected and shared through [`crate::state::AppState`]; none of them
//! holds lazily-initialized globals.

pub mod cart;
pub mod checkout;
pub mod notify;

pub use cart::CartService;
pub use checkout::{CheckoutOutcome, CheckoutService};
pub use notify::Notifier;
