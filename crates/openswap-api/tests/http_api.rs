//! HTTP surface integration tests.
//!
//! Drives the full REST flow through the router with in-process requests:
//! register → deposit → request → offer → accept, plus the error status
//! each failure shape maps to.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use openswap_api::{router, AppState};
use openswap_types::MarketRules;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/accounts",
        None,
        Some(json!({ "displayName": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn deposit(app: &Router, user: &str, currency: &str, amount: &str) {
    let (status, _) = send(
        app,
        Method::POST,
        "/accounts/deposits",
        Some(user),
        Some(json!({ "currency": currency, "amount": amount })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn balance_of(app: &Router, user: &str, currency: &str) -> String {
    let (status, body) = send(
        app,
        Method::GET,
        &format!("/accounts/balances/{currency}"),
        Some(user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["amount"].as_str().unwrap().to_string()
}

fn app() -> Router {
    let (state, _events) = AppState::new(MarketRules::default());
    // The event receiver is dropped: notifications are best-effort and the
    // REST flow must not depend on a running pump.
    router(state)
}

#[tokio::test]
async fn full_trade_flow() {
    let app = app();

    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    deposit(&app, &alice, "USD", "100").await;
    deposit(&app, &bob, "UGX", "370000").await;

    // Alice posts 100 USD → UGX.
    let (status, request) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(json!({ "fromCurrency": "USD", "toCurrency": "UGX", "amount": "100" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "active");
    let request_id = request["id"].as_str().unwrap().to_string();

    // The feed shows it, newest first, with the owner joined.
    let (status, feed) = send(&app, Method::GET, "/exchange-requests", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed.as_array().unwrap().len(), 1);
    assert_eq!(feed[0]["owner"]["displayName"], "alice");

    // Bob bids 3700.
    let (status, offer) = send(
        &app,
        Method::POST,
        "/rate-offers",
        Some(&bob),
        Some(json!({
            "exchangeRequestId": request_id,
            "rate": "3700",
            "totalAmount": "370000"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let offer_id = offer["id"].as_str().unwrap().to_string();

    let (status, offers) = send(
        &app,
        Method::GET,
        &format!("/rate-offers/{request_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(offers[0]["bidder"]["displayName"], "bob");

    // Alice accepts.
    let (status, accepted) = send(
        &app,
        Method::POST,
        &format!("/rate-offers/{offer_id}/accept"),
        Some(&alice),
        Some(json!({ "exchangeRequestId": request_id, "termsAccepted": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["request"]["status"], "completed");
    assert_eq!(accepted["offer"]["status"], "accepted");

    // Balances moved exactly per the trade terms.
    assert_eq!(balance_of(&app, &alice, "USD").await, "0");
    assert_eq!(balance_of(&app, &alice, "UGX").await, "370000");
    assert_eq!(balance_of(&app, &bob, "USD").await, "100");
    assert_eq!(balance_of(&app, &bob, "UGX").await, "0");

    // The audit log holds one verifiable settlement.
    let (status, settlements) = send(&app, Method::GET, "/settlements", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settlements.as_array().unwrap().len(), 1);
    assert_eq!(settlements[0]["totalAmount"], "370000");

    // A second accept of the same offer is a conflict, not a new trade.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/rate-offers/{offer_id}/accept"),
        Some(&alice),
        Some(json!({ "exchangeRequestId": request_id, "termsAccepted": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn terms_must_be_accepted_before_any_mutation() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    deposit(&app, &alice, "USD", "100").await;
    deposit(&app, &bob, "UGX", "370000").await;

    let (_, request) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(json!({ "fromCurrency": "USD", "toCurrency": "UGX", "amount": "100" })),
    )
    .await;
    let request_id = request["id"].as_str().unwrap().to_string();
    let (_, offer) = send(
        &app,
        Method::POST,
        "/rate-offers",
        Some(&bob),
        Some(json!({
            "exchangeRequestId": request_id,
            "rate": "3700",
            "totalAmount": "370000"
        })),
    )
    .await;
    let offer_id = offer["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/rate-offers/{offer_id}/accept"),
        Some(&alice),
        Some(json!({ "exchangeRequestId": request_id, "termsAccepted": false })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was touched: offer still pending, balances intact.
    let (_, offers) = send(
        &app,
        Method::GET,
        &format!("/rate-offers/{request_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(offers[0]["status"], "pending");
    assert_eq!(balance_of(&app, &alice, "USD").await, "100");
}

#[tokio::test]
async fn self_bid_is_forbidden() {
    let app = app();
    let alice = register(&app, "alice").await;
    deposit(&app, &alice, "USD", "100").await;

    let (_, request) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(json!({ "fromCurrency": "USD", "toCurrency": "UGX", "amount": "100" })),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/rate-offers",
        Some(&alice),
        Some(json!({
            "exchangeRequestId": request["id"],
            "rate": "3700",
            "totalAmount": "370000"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_active_pair_is_bad_request() {
    let app = app();
    let alice = register(&app, "alice").await;

    let body = json!({ "fromCurrency": "USD", "toCurrency": "UGX", "amount": "100" });
    let (status, _) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("OSW_ERR_101"));
}

#[tokio::test]
async fn only_the_owner_may_accept() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    deposit(&app, &alice, "USD", "100").await;
    deposit(&app, &bob, "UGX", "370000").await;

    let (_, request) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(json!({ "fromCurrency": "USD", "toCurrency": "UGX", "amount": "100" })),
    )
    .await;
    let request_id = request["id"].as_str().unwrap().to_string();
    let (_, offer) = send(
        &app,
        Method::POST,
        "/rate-offers",
        Some(&bob),
        Some(json!({
            "exchangeRequestId": request_id,
            "rate": "3700",
            "totalAmount": "370000"
        })),
    )
    .await;
    let offer_id = offer["id"].as_str().unwrap().to_string();

    // Bob tries to accept his own offer on Alice's request.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/rate-offers/{offer_id}/accept"),
        Some(&bob),
        Some(json!({ "exchangeRequestId": request_id, "termsAccepted": true })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn mismatched_offer_and_request_is_not_found() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    deposit(&app, &alice, "USD", "100").await;
    deposit(&app, &alice, "EUR", "100").await;
    deposit(&app, &bob, "UGX", "370000").await;

    let (_, request) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(json!({ "fromCurrency": "USD", "toCurrency": "UGX", "amount": "100" })),
    )
    .await;
    let request_id = request["id"].as_str().unwrap().to_string();
    let (_, other) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(json!({ "fromCurrency": "EUR", "toCurrency": "UGX", "amount": "100" })),
    )
    .await;
    let (_, offer) = send(
        &app,
        Method::POST,
        "/rate-offers",
        Some(&bob),
        Some(json!({
            "exchangeRequestId": request_id,
            "rate": "3700",
            "totalAmount": "370000"
        })),
    )
    .await;
    let offer_id = offer["id"].as_str().unwrap().to_string();

    // Accept names the wrong request for this offer.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/rate-offers/{offer_id}/accept"),
        Some(&alice),
        Some(json!({ "exchangeRequestId": other["id"], "termsAccepted": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_identity_header_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        None,
        Some(json!({ "fromCurrency": "USD", "toCurrency": "UGX", "amount": "100" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("x-user-id"));
}

#[tokio::test]
async fn malformed_currency_is_rejected() {
    let app = app();
    let alice = register(&app, "alice").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(json!({ "fromCurrency": "usd", "toCurrency": "UGX", "amount": "100" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn decline_leaves_the_request_open() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    deposit(&app, &alice, "USD", "100").await;
    deposit(&app, &bob, "UGX", "370000").await;

    let (_, request) = send(
        &app,
        Method::POST,
        "/exchange-requests",
        Some(&alice),
        Some(json!({ "fromCurrency": "USD", "toCurrency": "UGX", "amount": "100" })),
    )
    .await;
    let request_id = request["id"].as_str().unwrap().to_string();
    let (_, offer) = send(
        &app,
        Method::POST,
        "/rate-offers",
        Some(&bob),
        Some(json!({
            "exchangeRequestId": request_id,
            "rate": "3700",
            "totalAmount": "370000"
        })),
    )
    .await;
    let offer_id = offer["id"].as_str().unwrap().to_string();

    let (status, declined) = send(
        &app,
        Method::POST,
        &format!("/rate-offers/{offer_id}/decline"),
        Some(&alice),
        Some(json!({ "exchangeRequestId": request_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(declined["status"], "rejected");

    // Request still listed; balances untouched.
    let (_, feed) = send(&app, Method::GET, "/exchange-requests", None, None).await;
    assert_eq!(feed.as_array().unwrap().len(), 1);
    assert_eq!(balance_of(&app, &bob, "UGX").await, "370000");
}
