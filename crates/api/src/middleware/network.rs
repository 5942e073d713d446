//! Network simulation and per-request access logging.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::info;

/// Holds every request for the configured round trip before it is routed.
pub async fn simulate_rtt(State(rtt): State<Duration>, request: Request, next: Next) -> Response {
    if !rtt.is_zero() {
        tokio::time::sleep(rtt).await;
    }
    next.run(request).await
}

/// Logs method, path, status and elapsed seconds once the response is ready.
pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed = %format!("{:.5}", start.elapsed().as_secs_f64()),
        "request"
    );
    response
}
