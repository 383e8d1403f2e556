//! Shared helpers for Jacksnack integration tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`jack-cli migrate && jack-cli seed`)
//! - The storefront server running (`cargo run -p jacksnack-storefront`)
//!
//! All tests are `#[ignore]`d by default; run them with
//! `cargo test -p jacksnack-integration-tests -- --ignored`.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store so the session survives across
/// requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log in with a fresh throwaway email and return the client holding the
/// session cookie.
///
/// # Panics
///
/// Panics if the login request fails.
pub async fn logged_in_client() -> Client {
    let client = client();
    let email = format!("test-{}@example.com", Uuid::new_v4());

    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to log in");
    assert!(resp.status().is_success(), "login failed: {}", resp.status());

    client
}

/// Standard shipping fields for checkout bodies.
#[must_use]
pub fn shipping_fields() -> Value {
    json!({
        "first_name": "Asha",
        "last_name": "Rao",
        "address": "12 MG Road",
        "city": "Bengaluru",
        "state": "karnataka",
        "zip": "560001",
        "phone": "9876543210",
        "country": "india"
    })
}

/// Merge checkout extras (payment method, idempotency key) into a shipping
/// body.
///
/// # Panics
///
/// Panics if either value is not a JSON object.
#[must_use]
pub fn checkout_body(extras: &Value) -> Value {
    let mut body = shipping_fields();
    let obj = body.as_object_mut().expect("shipping fields are an object");
    for (k, v) in extras.as_object().expect("extras are an object") {
        obj.insert(k.clone(), v.clone());
    }
    body
}
