//! Handle on the ClickHouse database that stores accepted logs.

use crate::config::ClickHouseConfig;
use clickhouse::Client;
use tracing::info;

/// Log store connection. Clones share one HTTP pool.
#[derive(Clone)]
pub struct ClickHouseClient {
    inner: Client,
    config: ClickHouseConfig,
}

impl ClickHouseClient {
    /// Builds the handle. Nothing is sent until the first insert or ping, so
    /// the server can start while ClickHouse is still coming up.
    pub fn new(config: ClickHouseConfig) -> Self {
        let mut inner = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);
        if let Some(user) = config.username.as_deref() {
            inner = inner.with_user(user);
        }
        if let Some(password) = config.password.as_deref() {
            inner = inner.with_password(password);
        }

        info!(url = %config.url, database = %config.database, "Log store configured");

        Self { inner, config }
    }

    /// Round trip to the server.
    pub async fn ping(&self) -> Result<(), clickhouse::error::Error> {
        self.inner.query("SELECT 1").fetch_one::<u8>().await.map(|_| ())
    }

    pub fn inner(&self) -> &Client {
        &self.inner
    }

    pub fn config(&self) -> &ClickHouseConfig {
        &self.config
    }
}
