//! Tests for `POST /send_bulk`.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::fixtures::{self, APP_ID};
use integration_tests::setup::TestContext;
use serde_json::{json, Value};

fn server(ctx: &TestContext) -> TestServer {
    TestServer::new(ctx.router.clone()).expect("Failed to create test server")
}

#[tokio::test]
async fn test_bulk_all_stored() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let logs = vec![fixtures::signup(1), fixtures::trade(2), fixtures::buy_close(2, 1)];
    let response = server
        .post("/send_bulk")
        .json(&fixtures::bulk_body(APP_ID, logs))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["received"], 3);

    let records = ctx.captured();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.app_id == APP_ID));
}

#[tokio::test]
async fn test_bulk_partial_failure_keeps_stored_logs() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let logs = vec![
        fixtures::signup(1),
        fixtures::log("trade", json!({ "amount": 1, "price": 100 })),
        fixtures::trade(5),
    ];
    let response = server
        .post("/send_bulk")
        .json(&fixtures::bulk_body(APP_ID, logs))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["error"], "internal server error");

    let records = ctx.captured();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].user_id, 1);
    assert_eq!(records[1].trade_id, 5);
}

#[tokio::test]
async fn test_bulk_sink_failure_is_generic() {
    let ctx = TestContext::new();
    ctx.set_sink_failure(true);
    let server = server(&ctx);

    let response = server
        .post("/send_bulk")
        .json(&fixtures::bulk_body(APP_ID, vec![fixtures::signup(1)]))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(ctx.mock_sink.count(), 0);
}

#[tokio::test]
async fn test_bulk_empty_logs_succeeds() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server
        .post("/send_bulk")
        .json(&fixtures::bulk_body(APP_ID, vec![]))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["received"], 0);
    assert_eq!(ctx.mock_sink.count(), 0);
}

#[tokio::test]
async fn test_bulk_missing_app_id_rejected() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server
        .post("/send_bulk")
        .json(&json!({ "logs": [fixtures::signup(1)] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], "VALID_003");
    assert_eq!(ctx.mock_sink.count(), 0);
}

#[tokio::test]
async fn test_bulk_oversized_body_rejected() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let body = fixtures::oversized_bulk_body(APP_ID);
    assert!(body.len() > logger_core::limits::MAX_BULK_BODY_BYTES);

    let response = server
        .post("/send_bulk")
        .content_type("application/json")
        .text(body)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], "VALID_002");
    assert_eq!(ctx.mock_sink.count(), 0);
}

#[tokio::test]
async fn test_bulk_unparseable_body_rejected() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server.post("/send_bulk").text("{\"app_id\":").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}
