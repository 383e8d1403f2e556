//! Integration tests for checkout scenarios.
//!
//! Run with: cargo test -p jacksnack-integration-tests -- --ignored

use jacksnack_integration_tests::{base_url, checkout_body, logged_in_client};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

async fn add_to_cart(client: &reqwest::Client, product_id: &str, quantity: i32) {
    let resp = client
        .post(format!("{}/cart/add", base_url()))
        .json(&json!({ "product_id": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn submit_checkout(client: &reqwest::Client, extras: &Value) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}/checkout", base_url()))
        .json(&checkout_body(extras))
        .send()
        .await
        .expect("Failed to submit checkout");
    let status = resp.status();
    let body: Value = resp.json().await.expect("Failed to parse response");
    (status, body)
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_cod_checkout_places_order_and_clears_cart() {
    let client = logged_in_client().await;

    // prod_2 at 55.00, quantity 1: expect amount 95.00 (55 + 40 shipping)
    add_to_cart(&client, "prod_2", 1).await;

    let (status, body) = submit_checkout(&client, &json!({ "payment_method": "cod" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "placed");
    assert_eq!(body["payment_status"], "cod");
    assert_eq!(body["amount"], "95.00");
    assert!(body.get("payment_id").is_none());

    // The persisted order is readable and carries the same amount.
    let order_id = body["order_id"].as_str().expect("order_id in response");
    let order: Value = client
        .get(format!("{}/orders/{order_id}", base_url()))
        .send()
        .await
        .expect("Failed to fetch order")
        .json()
        .await
        .expect("Failed to parse order");
    assert_eq!(order["amount"], "95.00");
    assert_eq!(order["payment_method"], "cod");
    assert_eq!(order["order_status"], "placed");

    // The cart was cleared as the final step.
    let cart: Value = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_promotional_item_overrides_pricing_on_the_wire() {
    let client = logged_in_client().await;

    // prod_1 is the promotional product: subtotal and shipping both collapse
    // to 1.00 regardless of quantity.
    add_to_cart(&client, "prod_1", 5).await;

    let (status, body) = submit_checkout(&client, &json!({ "payment_method": "cod" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], "2.00");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_same_idempotency_key_creates_one_order() {
    let client = logged_in_client().await;
    add_to_cart(&client, "prod_3", 1).await;

    let key = Uuid::new_v4().to_string();
    let extras = json!({ "payment_method": "cod", "idempotency_key": key });

    let (first_status, first) = submit_checkout(&client, &extras).await;
    assert_eq!(first_status, StatusCode::OK);

    // A resubmission with the same key must not create a second order, even
    // though the cart is now empty the duplicate insert short-circuits first.
    add_to_cart(&client, "prod_3", 1).await;
    let (second_status, second) = submit_checkout(&client, &extras).await;
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["order_id"], second["order_id"]);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_with_empty_cart_is_rejected() {
    let client = logged_in_client().await;

    let (status, _body) = submit_checkout(&client, &json!({ "payment_method": "cod" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_missing_shipping_field_fails_before_any_side_effect() {
    let client = logged_in_client().await;
    add_to_cart(&client, "prod_2", 1).await;

    let mut body = checkout_body(&json!({ "payment_method": "cod" }));
    body["city"] = json!("");

    let resp = client
        .post(format!("{}/checkout", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to submit checkout");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The cart is untouched.
    let cart: Value = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_cancelled_payment_leaves_no_order() {
    let client = logged_in_client().await;

    // Cancelling an attempt is always acknowledged, and a later gateway
    // callback for the same attempt finds nothing to finalize.
    let attempt_id = Uuid::new_v4().to_string();
    let resp = client
        .post(format!("{}/payments/cancel", base_url()))
        .json(&json!({ "attempt_id": attempt_id }))
        .send()
        .await
        .expect("Failed to post cancel");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!(
            "{}/payments/callback?attempt={attempt_id}&razorpay_payment_id=pay_TEST",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to get callback");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_buy_now_single_product() {
    let client = jacksnack_integration_tests::client();

    let mut body = checkout_body(&json!({ "payment_method": "cod" }));
    body["email"] = json!("buyer@example.com");

    let resp = client
        .post(format!("{}/buy/prod_2", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to submit buy-now");
    assert_eq!(resp.status(), StatusCode::OK);

    let placed: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(placed["status"], "placed");
    assert_eq!(placed["amount"], "95.00");
}
