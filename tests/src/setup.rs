//! Common test setup functions.

use api::{router, AdmissionConfig, AppState};
use axum::Router;
use clickhouse_client::{health::init_schema, ClickHouseClient, ClickHouseSink, LogSink};
use logger_core::LogRecord;
use std::sync::Arc;
use std::time::Duration;

use crate::containers::TestClickHouse;
use crate::mocks::MockSink;

/// Admission settings that keep tests fast: two workers, 1-5ms release delay.
pub fn fast_admission() -> AdmissionConfig {
    AdmissionConfig {
        workers_per_app: 2,
        min_app_time_ms: 1,
        max_app_time_ms: 5,
    }
}

/// Test context with the real router over an in-memory sink.
pub struct TestContext {
    pub mock_sink: Arc<MockSink>,
    pub state: AppState,
    pub router: Router,
}

impl TestContext {
    /// Router without simulated round trip or access log.
    pub fn new() -> Self {
        Self::with_rtt(Duration::ZERO)
    }

    pub fn with_rtt(rtt: Duration) -> Self {
        Self::with_admission(fast_admission(), rtt)
    }

    pub fn with_admission(admission: AdmissionConfig, rtt: Duration) -> Self {
        let mock_sink = Arc::new(MockSink::new());
        let state = AppState::new(mock_sink.clone() as Arc<dyn LogSink>, admission)
            .with_rtt(rtt)
            .with_access_log(false);
        let router = router(state.clone());

        Self {
            mock_sink,
            state,
            router,
        }
    }

    /// Records stored so far.
    pub fn captured(&self) -> Vec<LogRecord> {
        self.mock_sink.captured()
    }

    /// Set the mock sink to fail (for error testing).
    pub fn set_sink_failure(&self, should_fail: bool) {
        self.mock_sink.set_should_fail(should_fail);
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Test context with the real router over a ClickHouse container.
pub struct ClickHouseContext {
    pub store: TestClickHouse,
    pub clickhouse: ClickHouseClient,
    pub router: Router,
}

impl ClickHouseContext {
    pub async fn new() -> Self {
        let store = TestClickHouse::start().await;
        let clickhouse = ClickHouseClient::new(store.config.clone());

        init_schema(&clickhouse)
            .await
            .expect("Failed to initialize schema");

        let sink: Arc<dyn LogSink> = Arc::new(ClickHouseSink::new(clickhouse.clone()));
        let state = AppState::new(sink, fast_admission())
            .with_rtt(Duration::ZERO)
            .with_access_log(false);

        Self {
            store,
            clickhouse,
            router: router(state),
        }
    }
}
