//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::{health, metrics};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - Full health check.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let report = health().report();

    Json(HealthResponse {
        status: report.status,
        clickhouse_connected: state.sink.is_healthy(),
        admission_keys: state.gate.key_count(),
        admission_waiting: state.gate.total_waiting(),
        metrics: metrics().snapshot(),
    })
}

/// GET /health/ready - Readiness probe (logs can be stored).
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    if state.sink.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
