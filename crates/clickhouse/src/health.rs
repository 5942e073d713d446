//! ClickHouse health checks and schema bootstrap.

use crate::client::ClickHouseClient;
use crate::schema::all_tables;
use logger_core::{Error, Result};
use telemetry::health;
use tracing::{debug, error, info};

/// Pings ClickHouse and records the outcome in the global health registry.
pub async fn check_connection(client: &ClickHouseClient) -> bool {
    match client.ping().await {
        Ok(_) => {
            health().clickhouse.set_healthy();
            info!("ClickHouse connection: healthy");
            true
        }
        Err(e) => {
            health().clickhouse.set_unhealthy(e.to_string());
            error!(error = %e, "ClickHouse connection: unhealthy");
            false
        }
    }
}

/// Creates the log table if it does not exist yet.
pub async fn init_schema(client: &ClickHouseClient) -> Result<()> {
    for ddl in all_tables() {
        client
            .inner()
            .query(ddl)
            .execute()
            .await
            .map_err(|e| Error::internal(format!("Failed to execute DDL: {}", e)))?;
    }

    debug!(database = %client.config().database, "ClickHouse schema initialized");
    Ok(())
}
