//! Concurrently-safe table of the latest probe result per target.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Outcome of the most recent probe of one target.
///
/// `status` is the HTTP status code, or [`crate::probe::NO_RESPONSE_STATUS`]
/// when the probe produced no response. `probed_at` is the time the probe was
/// issued, not the time it completed.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub index: usize,
    pub label: String,
    pub status: i32,
    pub probed_at: DateTime<Utc>,
}

/// Thread-safe store of the latest result per target key.
///
/// One writer per in-flight probe and any number of status-page readers.
/// Last-writer-wins per key; only a single probe per target is in flight at a
/// time, so no update is ever lost.
#[derive(Clone, Default)]
pub struct ResultStore {
    results: Arc<RwLock<HashMap<String, ProbeResult>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest result for a target, replacing any previous one.
    pub async fn record(&self, key: String, result: ProbeResult) {
        let mut results = self.results.write().await;
        results.insert(key, result);
    }

    /// Copy out the current results, in no particular order.
    pub async fn snapshot(&self) -> Vec<ProbeResult> {
        let results = self.results.read().await;
        results.values().cloned().collect()
    }

    /// Drop results whose target key is no longer configured.
    ///
    /// Called after a successful reload so removed targets disappear from the
    /// status page instead of going stale.
    pub async fn retain(&self, keys: &HashSet<String>) {
        let mut results = self.results.write().await;
        results.retain(|key, _| keys.contains(key));
    }
}
