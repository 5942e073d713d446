//! End-to-end tests against a real ClickHouse.
//!
//! Requires Docker, or `ISULOG_TEST_CLICKHOUSE_URL` pointing at a server.

use axum::http::StatusCode;
use axum_test::TestServer;
use clickhouse_client::query::{count_logs, query_logs, truncate_logs};
use integration_tests::fixtures;
use integration_tests::setup::ClickHouseContext;
use logger_core::Tag;

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_send_lands_in_clickhouse() {
    let ctx = ClickHouseContext::new().await;
    truncate_logs(&ctx.clickhouse).await.unwrap();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/send")
        .json(&fixtures::send_body("ch-app", fixtures::trade(9)))
        .await
        .assert_status_ok();

    assert_eq!(count_logs(&ctx.clickhouse, "ch-app").await.unwrap(), 1);

    let rows = query_logs(&ctx.clickhouse, "ch-app", 10).await.unwrap();
    assert_eq!(rows[0].tag, Tag::Trade.code());
    assert_eq!(rows[0].trade_id, 9);
    assert_eq!(rows[0].user_id, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_bulk_lands_in_clickhouse() {
    let ctx = ClickHouseContext::new().await;
    truncate_logs(&ctx.clickhouse).await.unwrap();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let logs = (1..=5).map(fixtures::signup).collect();
    server
        .post("/send_bulk")
        .json(&fixtures::bulk_body("ch-bulk", logs))
        .await
        .assert_status_ok();

    assert_eq!(count_logs(&ctx.clickhouse, "ch-bulk").await.unwrap(), 5);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_rejected_log_not_stored() {
    let ctx = ClickHouseContext::new().await;
    truncate_logs(&ctx.clickhouse).await.unwrap();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/send")
        .json(&fixtures::send_body(
            "ch-bad",
            fixtures::log("signup", serde_json::json!({})),
        ))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(count_logs(&ctx.clickhouse, "ch-bad").await.unwrap(), 0);
}
