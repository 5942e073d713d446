//! API routes.

pub mod health;
pub mod send;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    middleware::{from_fn, from_fn_with_state},
    routing::{any, get},
    Router,
};
use logger_core::limits::MAX_BULK_BODY_BYTES;
use telemetry::metrics;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::{access_log, simulate_rtt};
use crate::response::ApiError;
use crate::state::AppState;

/// Creates the API router.
///
/// The log endpoints answer any method; the harness only ever POSTs.
///
/// Every request, including unknown paths, waits out the simulated round trip
/// first. The access log wraps the whole stack so its timing includes it.
pub fn router(state: AppState) -> Router {
    let rtt = state.rtt;
    let log_requests = state.access_log;

    let router = Router::new()
        .route("/send", any(send::send_handler))
        .route(
            "/send_bulk",
            any(send::send_bulk_handler).layer(DefaultBodyLimit::max(MAX_BULK_BODY_BYTES)),
        )
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .fallback(not_found_handler)
        .layer(from_fn_with_state(rtt, simulate_rtt))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if log_requests {
        router.layer(from_fn(access_log))
    } else {
        router
    }
}

async fn not_found_handler(uri: Uri) -> ApiError {
    metrics().not_found_requests.inc();
    info!(path = %uri.path(), "Request not found");
    ApiError::not_found("Not found")
}
