//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Products
//! GET  /products               - Catalog listing (cached)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (requires session identity)
//! GET  /cart                   - Current line set
//! POST /cart/add               - Add a product (increment-or-insert)
//! POST /cart/remove            - Remove a line (idempotent)
//! POST /cart/clear             - Atomically clear the cart
//! GET  /cart/stream            - Live snapshots (server-sent events)
//!
//! # Checkout
//! POST /checkout               - Check out the whole cart
//! POST /buy/{id}               - Buy a single product (quantity 1)
//! GET  /orders/{id}            - Fetch an order confirmation
//!
//! # Payment gateway
//! GET  /payments/callback      - Gateway success callback (finalizes order)
//! POST /payments/cancel        - Customer dismissed the gateway page
//!
//! # Contact
//! POST /contact                - Contact form submission
//!
//! # Auth
//! POST /auth/login             - Establish session identity by email
//! POST /auth/logout            - Drop the session
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod orders;
pub mod payments;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/stream", get(cart::stream))
}

/// Create the payment gateway routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/callback", get(payments::callback))
        .route("/cancel", post(payments::cancel))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::checkout))
        .route("/buy/{id}", post(checkout::buy_now))
        .route("/orders/{id}", get(orders::show))
        .nest("/payments", payment_routes())
        .route("/contact", post(contact::submit))
        .nest("/auth", auth_routes())
}
