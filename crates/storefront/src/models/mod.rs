//! Domain models for the storefront.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartLine;
pub use order::{NewOrder, Order, OrderItem, ShippingInfo};
pub use product::Product;
pub use user::User;

/// Session keys used across handlers.
pub mod session_keys {
    /// The signed-in user's id.
    pub const USER_ID: &str = "user_id";
}
