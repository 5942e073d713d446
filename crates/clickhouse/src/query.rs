//! Read-back queries used by tests and operators. Not exposed over HTTP.

use crate::client::ClickHouseClient;
use clickhouse::Row;
use logger_core::{Error, Result};
use serde::Deserialize;

/// A stored log row.
#[derive(Debug, Clone, Row, Deserialize)]
pub struct StoredLogRow {
    pub app_id: String,
    pub tag: u8,
    pub time: i64,
    pub user_id: i64,
    pub trade_id: i64,
    pub data: String,
}

/// Count logs stored for an application.
pub async fn count_logs(client: &ClickHouseClient, app_id: &str) -> Result<u64> {
    let count: u64 = client
        .inner()
        .query("SELECT count() FROM log WHERE app_id = ?")
        .bind(app_id)
        .fetch_one()
        .await
        .map_err(|e| Error::internal(format!("Query error: {}", e)))?;
    Ok(count)
}

/// Fetch logs stored for an application, oldest first.
pub async fn query_logs(
    client: &ClickHouseClient,
    app_id: &str,
    limit: u32,
) -> Result<Vec<StoredLogRow>> {
    let rows: Vec<StoredLogRow> = client
        .inner()
        .query("SELECT app_id, tag, time, user_id, trade_id, data FROM log WHERE app_id = ? ORDER BY time LIMIT ?")
        .bind(app_id)
        .bind(limit)
        .fetch_all()
        .await
        .map_err(|e| Error::internal(format!("Query error: {}", e)))?;
    Ok(rows)
}

/// Truncate the log table (test cleanup).
pub async fn truncate_logs(client: &ClickHouseClient) -> Result<()> {
    client
        .inner()
        .query("TRUNCATE TABLE IF EXISTS log")
        .execute()
        .await
        .map_err(|e| Error::internal(format!("Truncate error: {}", e)))?;
    Ok(())
}
