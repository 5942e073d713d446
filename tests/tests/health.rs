//! Tests for health check endpoints.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::fixtures::{self, APP_ID};
use integration_tests::setup::TestContext;
use serde_json::Value;

fn server(ctx: &TestContext) -> TestServer {
    TestServer::new(ctx.router.clone()).expect("Failed to create test server")
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    for field in [
        "status",
        "clickhouse_connected",
        "admission_keys",
        "admission_waiting",
        "metrics",
    ] {
        assert!(body.get(field).is_some(), "Response should have '{}'", field);
    }

    let status = body["status"].as_str().unwrap_or("");
    assert!(
        status == "healthy" || status == "unhealthy",
        "unexpected status '{}'",
        status
    );
}

#[tokio::test]
async fn test_health_reports_admission_keys() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    server
        .post("/send")
        .json(&fixtures::send_body(APP_ID, fixtures::signup(1)))
        .await
        .assert_status_ok();

    let body: Value = server.get("/health").await.json();
    assert_eq!(body["admission_keys"], 1);
    assert_eq!(body["admission_waiting"], 0);
}

#[tokio::test]
async fn test_ready_follows_sink() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    server.get("/health/ready").await.assert_status_ok();

    ctx.set_sink_failure(true);
    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_live_endpoint() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    server.get("/health/live").await.assert_status_ok();
}
