//! Admission behaviour over a real socket.
//!
//! A client that hangs up mid-request must not take its slot or its release
//! delay with it.

use api::AdmissionConfig;
use integration_tests::fixtures::{self, APP_ID};
use integration_tests::setup::TestContext;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

const DELAY_MS: u64 = 600;

async fn serve(ctx: &TestContext) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = ctx.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_disconnected_client_holds_slot_for_full_delay() {
    let ctx = TestContext::with_admission(
        AdmissionConfig {
            workers_per_app: 1,
            min_app_time_ms: DELAY_MS,
            max_app_time_ms: DELAY_MS,
        },
        Duration::ZERO,
    );
    let addr = serve(&ctx).await;

    let body = fixtures::bulk_body(APP_ID, vec![fixtures::signup(1)]).to_string();
    let request = format!(
        "POST /send_bulk HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        addr,
        body.len(),
        body
    );

    let start = Instant::now();
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    // Hang up while the first request sits in its release delay.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(ctx.state.gate.waiting(APP_ID), 1);
    drop(stream);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(ctx.state.gate.waiting(APP_ID), 1);
    assert_eq!(ctx.mock_sink.count(), 1);

    let response = reqwest::Client::new()
        .post(format!("http://{}/send", addr))
        .json(&fixtures::send_body(APP_ID, fixtures::signup(2)))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // Both delays were served back to back.
    assert!(
        start.elapsed() >= Duration::from_millis(2 * DELAY_MS - 50),
        "second request finished after {:?}",
        start.elapsed()
    );
    assert_eq!(ctx.mock_sink.count(), 2);
    assert_eq!(ctx.state.gate.waiting(APP_ID), 0);
}
