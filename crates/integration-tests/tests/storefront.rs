//! Storefront flows over HTTP: catalog, cart session, sign-in.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use kultr_integration_tests::{GOOD_PASSWORD, client, spawn_storefront};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn get_json(client: &reqwest::Client, url: &str) -> (StatusCode, Value) {
    let resp = client.get(url).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

async fn post_json(client: &reqwest::Client, url: &str, body: &Value) -> (StatusCode, Value) {
    let resp = client.post(url).json(body).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health_echoes_request_id() {
    let server = spawn_storefront().await;
    let resp = client()
        .get(server.url("/health"))
        .header("x-request-id", "it-123")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-request-id"], "it-123");
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_shop_filters_and_pages() {
    let server = spawn_storefront().await;
    let client = client();

    let (status, body) = get_json(&client, &server.url("/shop")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 12);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["products"].as_array().unwrap().len(), 9);
    assert_eq!(body["has_next"], true);

    let (_, page_two) = get_json(&client, &server.url("/shop?page=2")).await;
    assert_eq!(page_two["products"].as_array().unwrap().len(), 3);

    // The page is kept when a narrower filter leaves only one page.
    let (_, narrowed) = get_json(&client, &server.url("/shop?category=Bags&page=2")).await;
    assert_eq!(narrowed["filtered_count"], 2);
    assert_eq!(narrowed["page"], 2);
    assert!(narrowed["products"].as_array().unwrap().is_empty());

    let (_, cheap) = get_json(&client, &server.url("/shop?price=0-100&sort=price-asc")).await;
    let prices: Vec<f64> = cheap["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(!prices.is_empty());
    assert!(prices.iter().all(|p| *p < 100.0));
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_unknown_sort_is_rejected() {
    let server = spawn_storefront().await;
    let resp = client()
        .get(server.url("/shop?sort=random"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_detail_and_search() {
    let server = spawn_storefront().await;
    let client = client();

    let (status, body) = get_json(&client, &server.url("/product/cashmere-sweater")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Cashmere Sweater");
    assert_eq!(body["default_size"], "XS");
    assert!(body["related"].as_array().unwrap().len() <= 4);

    let (status, _) = get_json(&client, &server.url("/product/no-such-thing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, results) = get_json(&client, &server.url("/search?q=SCARF")).await;
    assert_eq!(results["count"], 2);
}

#[tokio::test]
async fn test_cart_session_flow() {
    let server = spawn_storefront().await;
    let shopper = client();

    let (status, cart) = post_json(
        &shopper,
        &server.url("/cart/add"),
        &json!({ "product_id": 3, "quantity": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 1);
    assert_eq!(cart["subtotal"], "89.99");
    assert_eq!(cart["shipping"], "9.99");
    assert_eq!(cart["total"], "99.98");

    let line_id = cart["lines"][0]["id"].as_str().unwrap().to_string();

    // Decrease at quantity 1 keeps the line at 1.
    let (_, cart) = post_json(
        &shopper,
        &server.url(&format!("/cart/lines/{line_id}/decrease")),
        &Value::Null,
    )
    .await;
    assert_eq!(cart["lines"][0]["quantity"], 1);

    // Two units cross the free-shipping threshold.
    let (_, cart) = post_json(
        &shopper,
        &server.url(&format!("/cart/lines/{line_id}/increase")),
        &Value::Null,
    )
    .await;
    assert_eq!(cart["subtotal"], "179.98");
    assert_eq!(cart["shipping"], "0");

    // A second shopper has their own cart.
    let (_, other) = get_json(&client(), &server.url("/cart")).await;
    assert_eq!(other["item_count"], 0);

    let resp = shopper
        .delete(server.url(&format!("/cart/lines/{line_id}")))
        .send()
        .await
        .unwrap();
    let cart: Value = resp.json().await.unwrap();
    assert!(cart["lines"].as_array().unwrap().is_empty());
    assert_eq!(cart["item_count"], 0);
    assert_eq!(cart["subtotal"], "0");
}

#[tokio::test]
async fn test_cart_add_unknown_product_is_404() {
    let server = spawn_storefront().await;
    let (status, body) = post_json(
        &client(),
        &server.url("/cart/add"),
        &json!({ "product_id": 999 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_sign_in_flow() {
    let server = spawn_storefront().await;
    let shopper = client();

    let (status, _) = get_json(&shopper, &server.url("/account")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post_json(
        &shopper,
        &server.url("/auth/login"),
        &json!({ "email": "a@x.com", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, body) = post_json(
        &shopper,
        &server.url("/auth/login"),
        &json!({ "email": "a@x.com", "password": GOOD_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/account");

    let (status, body) = get_json(&shopper, &server.url("/account")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["email"], "a@x.com");

    let (status, _) = post_json(&shopper, &server.url("/auth/logout"), &Value::Null).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get_json(&shopper, &server.url("/account")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_in_validation() {
    let server = spawn_storefront().await;
    let (status, body) = post_json(
        &client(),
        &server.url("/auth/login"),
        &json!({ "email": "not-an-email", "password": "ab" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_string());
    assert!(body["fields"]["password"].is_string());
}
