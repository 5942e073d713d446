//! In-process metrics.
//!
//! Plain atomics read back through [`Metrics::snapshot`] and reported by the
//! health endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v.saturating_sub(1)));
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the log server.
#[derive(Debug, Default)]
pub struct Metrics {
    // Requests
    pub send_requests: Counter,
    pub bulk_requests: Counter,
    pub not_found_requests: Counter,

    // Records
    pub logs_received: Counter,
    pub logs_validated: Counter,
    pub logs_failed_validation: Counter,

    // Storage
    pub sink_inserts: Counter,
    pub sink_insert_errors: Counter,

    // Latency histograms
    pub ingest_latency_ms: Histogram,
    pub admission_delay_ms: Histogram,
    pub sink_latency_ms: Histogram,

    // Gauges
    pub admission_waiting: Gauge,
    pub admission_keys: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub send_requests: u64,
    pub bulk_requests: u64,
    pub not_found_requests: u64,
    pub logs_received: u64,
    pub logs_validated: u64,
    pub logs_failed_validation: u64,
    pub sink_inserts: u64,
    pub sink_insert_errors: u64,
    pub ingest_latency_mean_ms: f64,
    pub admission_delay_mean_ms: f64,
    pub sink_latency_mean_ms: f64,
    pub admission_waiting: u64,
    pub admission_keys: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            send_requests: self.send_requests.get(),
            bulk_requests: self.bulk_requests.get(),
            not_found_requests: self.not_found_requests.get(),
            logs_received: self.logs_received.get(),
            logs_validated: self.logs_validated.get(),
            logs_failed_validation: self.logs_failed_validation.get(),
            sink_inserts: self.sink_inserts.get(),
            sink_insert_errors: self.sink_insert_errors.get(),
            ingest_latency_mean_ms: self.ingest_latency_ms.mean(),
            admission_delay_mean_ms: self.admission_delay_ms.mean(),
            sink_latency_mean_ms: self.sink_latency_ms.mean(),
            admission_waiting: self.admission_waiting.get(),
            admission_keys: self.admission_keys.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
