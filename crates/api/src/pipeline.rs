//! Ingestion pipeline: admission, validation, storage.

use crate::admission::AdmissionGate;
use chrono::Utc;
use clickhouse_client::LogSink;
use logger_core::{require_app_id, validate_log, Error, Log, Result};
use std::sync::Arc;
use telemetry::metrics;
use tokio::task::JoinError;
use tracing::warn;

/// Outcome of a bulk request. Stored logs stay stored even when others fail.
#[derive(Debug, Default)]
pub struct BulkReport {
    pub stored: usize,
    pub errors: Vec<Error>,
}

impl BulkReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs logs through validation into the sink while holding an admission slot.
pub struct Ingestor {
    gate: Arc<AdmissionGate>,
    sink: Arc<dyn LogSink>,
}

impl Ingestor {
    pub fn new(gate: Arc<AdmissionGate>, sink: Arc<dyn LogSink>) -> Self {
        Self { gate, sink }
    }

    /// Stores a single log under one admission slot.
    pub async fn ingest(&self, app_id: &str, log: &Log) -> Result<()> {
        require_app_id(app_id)?;

        let permit = self.gate.acquire(app_id).await;
        let result = self.put_log(app_id, log).await;
        permit.release().await;

        result
    }

    /// Stores every log of a batch under one admission slot.
    ///
    /// A failing log does not stop the rest; there is no rollback.
    pub async fn ingest_bulk(&self, app_id: &str, logs: &[Log]) -> Result<BulkReport> {
        require_app_id(app_id)?;

        let permit = self.gate.acquire(app_id).await;
        let mut report = BulkReport::default();
        for (index, log) in logs.iter().enumerate() {
            match self.put_log(app_id, log).await {
                Ok(()) => report.stored += 1,
                Err(e) => {
                    warn!(app_id = %app_id, index = index, error = %e, "Bulk log not stored");
                    report.errors.push(e);
                }
            }
        }
        permit.release().await;

        Ok(report)
    }

    /// [`Ingestor::ingest`] on its own task. The admission wait, the store and
    /// the release delay run to completion even if the caller is dropped, so a
    /// client that hangs up still occupies its slot for the full delay.
    pub async fn ingest_detached(self: Arc<Self>, app_id: String, log: Log) -> Result<()> {
        let task = tokio::spawn(async move { self.ingest(&app_id, &log).await });
        joined(task.await)
    }

    /// [`Ingestor::ingest_bulk`] on its own task; every log is attempted even
    /// if the caller is dropped.
    pub async fn ingest_bulk_detached(
        self: Arc<Self>,
        app_id: String,
        logs: Vec<Log>,
    ) -> Result<BulkReport> {
        let task = tokio::spawn(async move { self.ingest_bulk(&app_id, &logs).await });
        joined(task.await)
    }

    async fn put_log(&self, app_id: &str, log: &Log) -> Result<()> {
        metrics().logs_received.inc();

        let record = match validate_log(app_id, log, Utc::now().timestamp()) {
            Ok(record) => {
                metrics().logs_validated.inc();
                record
            }
            Err(e) => {
                metrics().logs_failed_validation.inc();
                return Err(e);
            }
        };

        self.sink.insert(&record).await
    }
}

fn joined<T>(outcome: std::result::Result<Result<T>, JoinError>) -> Result<T> {
    outcome.map_err(|e| Error::internal(format!("ingest task failed: {}", e)))?
}
