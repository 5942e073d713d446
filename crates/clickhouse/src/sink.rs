//! Storage sink for validated logs.

use crate::client::ClickHouseClient;
use crate::schema::LOG_TABLE;
use async_trait::async_trait;
use clickhouse::Row;
use logger_core::{error::DbErrorCode, Error, LogRecord, Result};
use serde::Serialize;
use std::time::Instant;
use telemetry::{health, metrics};
use tracing::{debug, error};

/// Durable append target for validated logs.
///
/// Each call stores exactly one record. Implementations must be safe to call
/// concurrently; callers never retry a failed insert.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Stores one record.
    async fn insert(&self, record: &LogRecord) -> Result<()>;

    /// Whether the sink is currently believed to accept writes.
    fn is_healthy(&self) -> bool;
}

/// Row layout of the `log` table.
#[derive(Debug, Clone, Row, Serialize)]
pub struct LogRow {
    pub app_id: String,
    pub tag: u8,
    /// Seconds since epoch, `DateTime64(0)`
    pub time: i64,
    pub user_id: i64,
    pub trade_id: i64,
    pub data: String,
}

impl From<&LogRecord> for LogRow {
    fn from(record: &LogRecord) -> Self {
        Self {
            app_id: record.app_id.clone(),
            tag: record.tag.code(),
            time: record.time,
            user_id: record.user_id,
            trade_id: record.trade_id,
            data: record.data.clone(),
        }
    }
}

/// Writes each record as its own ClickHouse insert.
#[derive(Clone)]
pub struct ClickHouseSink {
    client: ClickHouseClient,
}

impl ClickHouseSink {
    pub fn new(client: ClickHouseClient) -> Self {
        Self { client }
    }

    async fn write_row(&self, row: &LogRow) -> clickhouse::error::Result<()> {
        let mut insert = self.client.inner().insert::<LogRow>(LOG_TABLE)?;
        insert.write(row).await?;
        insert.end().await
    }
}

#[async_trait]
impl LogSink for ClickHouseSink {
    async fn insert(&self, record: &LogRecord) -> Result<()> {
        let row = LogRow::from(record);
        let start = Instant::now();

        let result = self.write_row(&row).await;
        metrics()
            .sink_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        match result {
            Ok(()) => {
                metrics().sink_inserts.inc();
                debug!(
                    app_id = %row.app_id,
                    tag = row.tag,
                    user_id = row.user_id,
                    trade_id = row.trade_id,
                    "Inserted log"
                );
                Ok(())
            }
            Err(e) => {
                metrics().sink_insert_errors.inc();
                error!(app_id = %row.app_id, tag = row.tag, error = %e, "Log insert failed");
                Err(Error::database(
                    DbErrorCode::StoreFailed,
                    format!("insert log failed: {}", e),
                ))
            }
        }
    }

    fn is_healthy(&self) -> bool {
        health().clickhouse.is_healthy()
    }
}
