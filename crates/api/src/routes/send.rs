//! Log submission endpoints.
//!
//! `POST /send` stores one log, `POST /send_bulk` stores a batch. Both hold a
//! single admission slot for their application key for the whole request.
//! The work runs detached from the connection: a client that hangs up does
//! not cut short the wait, the batch, or the release delay.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use logger_core::{error::ValidationErrorCode, BulkLog, SoloLog};
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, info, warn};

use crate::response::{ApiError, IngestResponse};
use crate::state::AppState;

const UNPARSEABLE_BODY: &str = "can't parse body";

/// POST /send - Store one log.
///
/// Caller faults come back as 400 with their reason; storage failures as a
/// generic 500.
pub async fn send_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let start = Instant::now();
    metrics().send_requests.inc();

    let solo: SoloLog = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Failed to parse send body");
        ApiError::bad_request(UNPARSEABLE_BODY)
    })?;
    let (app_id, log) = solo.into_parts();
    let tag = log.tag.clone();

    state
        .ingestor
        .clone()
        .ingest_detached(app_id.clone(), log)
        .await
        .map_err(|e| {
            if !e.is_caller_fault() {
                warn!(app_id = %app_id, tag = %tag, error = %e, "Send failed");
            }
            ApiError::from(e)
        })?;

    metrics()
        .ingest_latency_ms
        .observe(start.elapsed().as_millis() as u64);

    Ok(Json(IngestResponse::success(1)))
}

/// POST /send_bulk - Store a batch of logs.
///
/// Every log is attempted. If any fails the whole request answers 500, even
/// though the others were stored.
pub async fn send_bulk_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    let start = Instant::now();
    metrics().bulk_requests.inc();

    let body = body.map_err(|e| {
        debug!(error = %e, "Failed to read bulk body");
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::with_code(
                StatusCode::BAD_REQUEST,
                ValidationErrorCode::BatchTooLarge.code(),
                UNPARSEABLE_BODY,
            )
        } else {
            ApiError::bad_request(UNPARSEABLE_BODY)
        }
    })?;

    let bulk: BulkLog = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Failed to parse bulk body");
        ApiError::bad_request(UNPARSEABLE_BODY)
    })?;

    let app_id = bulk.app_id;
    let report = state
        .ingestor
        .clone()
        .ingest_bulk_detached(app_id.clone(), bulk.logs)
        .await
        .map_err(ApiError::from)?;

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().ingest_latency_ms.observe(latency_ms);

    if !report.is_success() {
        warn!(
            app_id = %app_id,
            stored = report.stored,
            failed = report.errors.len(),
            "Bulk request partially failed"
        );
        return Err(ApiError::internal());
    }

    info!(
        app_id = %app_id,
        stored = report.stored,
        latency_ms = latency_ms,
        "Bulk request stored"
    );

    Ok(Json(IngestResponse::success(report.stored)))
}
