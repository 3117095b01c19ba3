use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tower::ServiceExt;

use engine::{Engine, Store};
use server::router;

fn app() -> Router {
    router(Arc::new(RwLock::new(
        Engine::builder().store(Store::new()).build(),
    )))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
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

async fn create_account(app: &Router, name: &str, opening_minor: i64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/accounts",
        Some(json!({
            "name": name,
            "kind": "checking",
            "opening_balance_minor": opening_minor,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_and_fetch_an_account() {
    let app = app();
    let id = create_account(&app, "Checking", 100_00).await;

    let (status, body) = send(&app, "GET", &format!("/accounts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Checking");
    assert_eq!(body["balance_minor"], 100_00);
    assert_eq!(body["status"], "active");
    assert_eq!(body["currency"], "EUR");
}

#[tokio::test]
async fn transfer_between_accounts_end_to_end() {
    let app = app();
    let a = create_account(&app, "A", 1000_00).await;
    let b = create_account(&app, "B", 0).await;

    let (status, body) = send(
        &app,
        "POST",
        "/accounts/transfer",
        Some(json!({
            "from_account_id": a,
            "to_account_id": b,
            "amount_minor": 300_00,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from_account"]["balance_minor"], 700_00);
    assert_eq!(body["to_account"]["balance_minor"], 300_00);
    assert_eq!(body["from_account"]["history"][0]["linked_account_id"], json!(b));
    assert_eq!(body["to_account"]["history"][0]["linked_account_id"], json!(a));

    // Not enough left for a second, bigger transfer.
    let (status, body) = send(
        &app,
        "POST",
        "/accounts/transfer",
        Some(json!({
            "from_account_id": a,
            "to_account_id": b,
            "amount_minor": 1000_00,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("insufficient"));

    let (_, body) = send(&app, "GET", &format!("/accounts/{a}"), None).await;
    assert_eq!(body["balance_minor"], 700_00);

    let (status, _) = send(
        &app,
        "POST",
        "/accounts/transfer",
        Some(json!({
            "from_account_id": a,
            "to_account_id": "00000000-0000-0000-0000-000000000000",
            "amount_minor": 10_00,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn record_and_update_a_transaction() {
    let app = app();
    let account = create_account(&app, "Checking", 100_00).await;

    let (status, body) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "account_id": account,
            "kind": "expense",
            "amount_minor": 30_00,
            "note": "groceries",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["account_name"], "Checking");
    let tx_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, "GET", &format!("/accounts/{account}"), None).await;
    assert_eq!(body["balance_minor"], 70_00);

    // Same values back: the reversal must leave the balance unchanged.
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/transactions/{tx_id}"),
        Some(json!({ "amount_minor": 30_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", &format!("/accounts/{account}"), None).await;
    assert_eq!(body["balance_minor"], 70_00);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/transactions/{tx_id}"),
        Some(json!({ "amount_minor": 10_00, "kind": "income" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", &format!("/accounts/{account}"), None).await;
    assert_eq!(body["balance_minor"], 110_00);

    let (status, _) = send(
        &app,
        "PATCH",
        "/transactions/00000000-0000-0000-0000-000000000000",
        Some(json!({ "amount_minor": 10_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "account_id": account,
            "kind": "expense",
            "amount_minor": 0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn archive_lifecycle_over_http() {
    let app = app();
    let id = create_account(&app, "Old account", 0).await;

    // Deleting before archiving is a conflict.
    let (status, _) = send(&app, "DELETE", &format!("/archive/accounts/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "PUT", &format!("/accounts/{id}/archive"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(&app, "GET", "/archive/accounts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["items"][0]["name"], "Old account");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/archive/accounts/{id}/restore"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["status"], "active");

    // Back into the archive, then gone for good.
    send(&app, "PUT", &format!("/accounts/{id}/archive"), None).await;
    let (status, body) = send(&app, "DELETE", &format!("/archive/accounts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    let (status, _) = send(&app, "DELETE", &format!("/archive/accounts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_account_still_renders_in_transactions() {
    let app = app();
    let a = create_account(&app, "Doomed", 100_00).await;
    let b = create_account(&app, "Keeper", 0).await;
    send(
        &app,
        "POST",
        "/accounts/transfer",
        Some(json!({
            "from_account_id": a,
            "to_account_id": b,
            "amount_minor": 40_00,
        })),
    )
    .await;

    send(&app, "PUT", &format!("/accounts/{a}/archive"), None).await;
    send(&app, "DELETE", &format!("/archive/accounts/{a}"), None).await;

    let (status, body) = send(&app, "GET", "/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"][0]["account_name"], "Doomed (removed)");
    assert_eq!(body["transactions"][0]["to_account_name"], "Keeper");
}

#[tokio::test]
async fn unknown_archive_type_is_rejected() {
    let app = app();
    let (status, _) = send(&app, "GET", "/archive/wallets", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn archive_stats_over_http() {
    let app = app();
    let id = create_account(&app, "Checking", 0).await;
    send(&app, "PUT", &format!("/accounts/{id}/archive"), None).await;

    let (status, body) = send(&app, "GET", "/archive/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["by_kind"]["accounts"], 1);
    assert_eq!(body["by_kind"]["debts"], 0);
    assert!(body["oldest"].is_string());
}

#[tokio::test]
async fn subscription_billing_over_http() {
    let app = app();
    let account = create_account(&app, "Checking", 100_00).await;

    let (status, body) = send(
        &app,
        "POST",
        "/subscriptions",
        Some(json!({
            "name": "Streaming",
            "amount_minor": 15_00,
            "account_id": account,
            "frequency": "monthly",
            "next_payment_date": "2024-01-10",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/subscriptions/{id}/payment"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscription"]["next_payment_date"], "2024-02-10");
    assert_eq!(body["subscription"]["payments"].as_array().unwrap().len(), 1);
    assert_eq!(body["payment"]["outcome"], "success");
    assert_eq!(body["transaction"]["kind"], "expense");
    assert_eq!(body["account"]["balance_minor"], 85_00);

    let (status, _) = send(
        &app,
        "POST",
        "/subscriptions/00000000-0000-0000-0000-000000000000/payment",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn debt_payments_over_http() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/debts",
        Some(json!({
            "name": "Car loan",
            "kind": "owed",
            "initial_minor": 1000_00,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/debts/{id}/payment"),
        Some(json!({ "amount_minor": 400_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining_minor"], 600_00);
    assert_eq!(body["status"], "active");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/debts/{id}/payment"),
        Some(json!({ "amount_minor": 600_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining_minor"], 0);
    assert_eq!(body["status"], "paid");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/debts/{id}/payment"),
        Some(json!({ "amount_minor": 1_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn goal_funding_over_http() {
    let app = app();
    let account = create_account(&app, "Savings", 600_00).await;
    let (status, body) = send(
        &app,
        "POST",
        "/goals",
        Some(json!({ "name": "Bike", "target_minor": 500_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/goals/{id}/transfer"),
        Some(json!({ "from_account_id": account, "amount_minor": 500_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"]["status"], "completed");
    assert_eq!(body["goal"]["progress_minor"], 500_00);
    assert_eq!(body["goal"]["transfers"][0]["from_account_name"], "Savings");
    assert_eq!(body["account"]["balance_minor"], 100_00);
}

#[tokio::test]
async fn listing_defaults_and_status_filters() {
    let app = app();
    for index in 0..12 {
        let (status, _) = send(
            &app,
            "POST",
            "/categories",
            Some(json!({ "name": format!("Category {index}"), "kind": "expense" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["total"], 12);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["pagination"]["current_page"], 1);
    assert_eq!(body["pagination"]["limit"], 10);

    let (status, body) = send(&app, "GET", "/categories?page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);

    // Comma-separated status lists parse; unknown tokens do not.
    let (status, _) = send(&app, "GET", "/subscriptions?status=active,paused", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/subscriptions?status=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/categories?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
