//! Application state shared across handlers.

use crate::admission::{AdmissionConfig, AdmissionGate};
use crate::pipeline::Ingestor;
use clickhouse_client::LogSink;
use std::sync::Arc;
use std::time::Duration;

/// Simulated network round trip charged to every request before routing.
pub const DEFAULT_RTT: Duration = Duration::from_millis(100);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Log storage (ClickHouse in production, mock in tests)
    pub sink: Arc<dyn LogSink>,
    /// Per-application admission control
    pub gate: Arc<AdmissionGate>,
    /// Validation and storage under the gate
    pub ingestor: Arc<Ingestor>,
    /// Delay applied before every request
    pub rtt: Duration,
    /// Whether to log one line per request
    pub access_log: bool,
}

impl AppState {
    pub fn new(sink: Arc<dyn LogSink>, admission: AdmissionConfig) -> Self {
        let gate = Arc::new(AdmissionGate::new(admission));
        let ingestor = Arc::new(Ingestor::new(gate.clone(), sink.clone()));

        Self {
            sink,
            gate,
            ingestor,
            rtt: DEFAULT_RTT,
            access_log: true,
        }
    }

    pub fn with_rtt(mut self, rtt: Duration) -> Self {
        self.rtt = rtt;
        self
    }

    pub fn with_access_log(mut self, enabled: bool) -> Self {
        self.access_log = enabled;
        self
    }
}
