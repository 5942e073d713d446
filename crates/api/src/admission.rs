//! Per-application admission control.
//!
//! Each application key gets a fixed number of worker slots. Requests beyond
//! that wait, without timeout, for a slot to free up. On release a request is
//! held back for a delay that grows with how many requests for the same key
//! were in flight when it arrived, which makes the endpoint degrade under
//! per-key load the way a struggling backend would.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use telemetry::metrics;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// Admission control configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Concurrent requests allowed per application key
    #[serde(default = "default_workers_per_app")]
    pub workers_per_app: usize,
    /// Lower bound of the release delay
    #[serde(default = "default_min_app_time_ms")]
    pub min_app_time_ms: u64,
    /// Upper bound of the release delay
    #[serde(default = "default_max_app_time_ms")]
    pub max_app_time_ms: u64,
}

fn default_workers_per_app() -> usize {
    2
}

fn default_min_app_time_ms() -> u64 {
    20
}

fn default_max_app_time_ms() -> u64 {
    1000
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            workers_per_app: default_workers_per_app(),
            min_app_time_ms: default_min_app_time_ms(),
            max_app_time_ms: default_max_app_time_ms(),
        }
    }
}

impl AdmissionConfig {
    pub fn min_app_time(&self) -> Duration {
        Duration::from_millis(self.min_app_time_ms)
    }

    pub fn max_app_time(&self) -> Duration {
        Duration::from_millis(self.max_app_time_ms)
    }

    /// Delay charged on release to a request that counted `waiting` in-flight
    /// requests for its key (itself included) when it arrived.
    ///
    /// `min(max_app_time, floor(2^(waiting/2) * 2) ms + min_app_time)`
    pub fn release_delay(&self, waiting: u64) -> Duration {
        let max = self.max_app_time();
        let grown_ms = (2f64.powf(waiting as f64 / 2.0) * 2.0)
            .floor()
            .min(self.max_app_time_ms as f64);
        Duration::from_millis(grown_ms as u64)
            .saturating_add(self.min_app_time())
            .min(max)
    }
}

/// Admission state of one application key. Never removed once created.
struct KeyState {
    slots: Arc<Semaphore>,
    waiting: AtomicU64,
}

/// Counts a request in `waiting` for as long as it lives. Also un-counts a
/// request whose task panicked or was torn down with the runtime.
struct WaitingEntry {
    state: Arc<KeyState>,
}

impl Drop for WaitingEntry {
    fn drop(&mut self) {
        self.state.waiting.fetch_sub(1, Ordering::SeqCst);
        metrics().admission_waiting.dec();
    }
}

/// Per-key concurrency limiter with a contention-driven release delay.
pub struct AdmissionGate {
    keys: Mutex<HashMap<String, Arc<KeyState>>>,
    config: AdmissionConfig,
}

impl AdmissionGate {
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            keys: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Returns the state for `app_id`, creating it on first sight.
    fn key_state(&self, app_id: &str) -> Arc<KeyState> {
        let mut keys = self.keys.lock();
        if let Some(state) = keys.get(app_id) {
            return state.clone();
        }

        let state = Arc::new(KeyState {
            slots: Arc::new(Semaphore::new(self.config.workers_per_app.max(1))),
            waiting: AtomicU64::new(0),
        });
        keys.insert(app_id.to_string(), state.clone());
        metrics().admission_keys.set(keys.len() as u64);
        debug!(app_id = %app_id, keys = keys.len(), "Created admission state");
        state
    }

    /// Waits for a free slot for `app_id`.
    ///
    /// The request is counted as waiting before it blocks, and the count it
    /// observes (its own arrival included) fixes its release delay. Never
    /// fails and never times out. Callers must not abandon the future: a
    /// request detached from its connection keeps its place in line.
    pub async fn acquire(&self, app_id: &str) -> AdmissionPermit {
        let state = self.key_state(app_id);
        let waiting = state.waiting.fetch_add(1, Ordering::SeqCst) + 1;
        metrics().admission_waiting.inc();
        let entry = WaitingEntry {
            state: state.clone(),
        };

        let slot = state
            .slots
            .clone()
            .acquire_owned()
            .await
            .expect("admission semaphores are never closed");

        debug!(app_id = %app_id, waiting = waiting, "Admitted");

        AdmissionPermit {
            delay: self.config.release_delay(waiting),
            waiting,
            entry,
            _slot: slot,
        }
    }

    /// Number of application keys seen so far.
    pub fn key_count(&self) -> usize {
        self.keys.lock().len()
    }

    /// Requests currently counted as waiting for `app_id`.
    pub fn waiting(&self, app_id: &str) -> u64 {
        self.keys
            .lock()
            .get(app_id)
            .map(|s| s.waiting.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Requests currently counted as waiting across all keys.
    pub fn total_waiting(&self) -> u64 {
        self.keys
            .lock()
            .values()
            .map(|s| s.waiting.load(Ordering::SeqCst))
            .sum()
    }
}

/// A held slot for one application key.
///
/// Every request ends with [`AdmissionPermit::release`], which applies the
/// release delay. A permit only drops without it when its task panics, and
/// then the slot is freed at once.
pub struct AdmissionPermit {
    delay: Duration,
    waiting: u64,
    // Field order matters: the waiting count drops before the slot is freed.
    entry: WaitingEntry,
    _slot: OwnedSemaphorePermit,
}

impl AdmissionPermit {
    /// In-flight count observed on arrival, this request included.
    pub fn waiting(&self) -> u64 {
        self.waiting
    }

    /// Delay that [`AdmissionPermit::release`] will sleep for.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the release delay, then gives the slot back.
    pub async fn release(self) {
        tokio::time::sleep(self.delay).await;
        metrics()
            .admission_delay_ms
            .observe(self.delay.as_millis() as u64);
        debug!(
            waiting = self.waiting,
            remaining = self.entry.state.waiting.load(Ordering::SeqCst) - 1,
            delay_ms = self.delay.as_millis() as u64,
            "Released"
        );
    }
}
