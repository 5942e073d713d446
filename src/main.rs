//! Benchmark Log Server
//!
//! Receives tagged logs from the benchmark harness:
//! - per-tag schema validation
//! - per-application admission control with a load-dependent release delay
//! - one ClickHouse insert per accepted log

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AdmissionConfig, AppState};
use clickhouse_client::{ClickHouseClient, ClickHouseConfig, ClickHouseSink, LogSink};
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Simulated network round trip added to every request
    #[serde(default = "default_rtt_ms")]
    rtt_ms: u64,

    /// One info line per request
    #[serde(default = "default_access_log")]
    access_log: bool,

    #[serde(default)]
    admission: AdmissionConfig,

    #[serde(default)]
    clickhouse: ClickHouseConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5516
}

fn default_rtt_ms() -> u64 {
    100
}

fn default_access_log() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rtt_ms: default_rtt_ms(),
            access_log: default_access_log(),
            admission: AdmissionConfig::default(),
            clickhouse: ClickHouseConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting log server v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        workers_per_app = config.admission.workers_per_app,
        min_app_time_ms = config.admission.min_app_time_ms,
        max_app_time_ms = config.admission.max_app_time_ms,
        rtt_ms = config.rtt_ms,
        "Loaded admission config"
    );

    let clickhouse = ClickHouseClient::new(config.clickhouse.clone());

    if let Err(e) = clickhouse_client::health::init_schema(&clickhouse).await {
        // The table may already exist; inserts will report if it does not.
        error!("Failed to initialize ClickHouse schema: {}", e);
    }

    if !clickhouse_client::health::check_connection(&clickhouse).await {
        warn!("Starting without a reachable ClickHouse; inserts will fail until it is up");
    }

    let sink: Arc<dyn LogSink> = Arc::new(ClickHouseSink::new(clickhouse));
    let state = AppState::new(sink, config.admission.clone())
        .with_rtt(Duration::from_millis(config.rtt_ms))
        .with_access_log(config.access_log);

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("ISULOG")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(url) = std::env::var("ISULOG_CLICKHOUSE_URL") {
        config.clickhouse.url = url;
    }
    if let Ok(database) = std::env::var("ISULOG_CLICKHOUSE_DATABASE") {
        config.clickhouse.database = database;
    }
    if let Ok(username) = std::env::var("ISULOG_CLICKHOUSE_USERNAME") {
        config.clickhouse.username = Some(username);
    }
    if let Ok(password) = std::env::var("ISULOG_CLICKHOUSE_PASSWORD") {
        config.clickhouse.password = Some(password);
    }
    if let Ok(workers) = std::env::var("ISULOG_WORKERS_PER_APP") {
        config.admission.workers_per_app = workers
            .parse()
            .context("ISULOG_WORKERS_PER_APP must be a positive integer")?;
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
