//! Poll scheduler: the synchronized-tick probing engine.
//!
//! One long-lived loop fans out a concurrent probe per target each tick and
//! waits for every probe to resolve before sleeping out the interval. Ticks
//! never overlap, so at most one probe per target is in flight at any
//! instant. A failing probe is recorded as a no-response result; nothing a
//! single target does can stall the loop or the other targets in its tick.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinSet;

use crate::config::Domain;
use crate::probe::{self, ProbeError, NO_RESPONSE_STATUS};
use crate::registry::Target;
use crate::store::{ProbeResult, ResultStore};

/// Floor applied to the configured poll interval.
pub const MIN_POLL_INTERVAL_SECS: u64 = 60;

/// Clamp a configured interval to the enforced floor.
pub fn poll_interval(configured_secs: u64) -> Duration {
    Duration::from_secs(configured_secs.max(MIN_POLL_INTERVAL_SECS))
}

/// The scheduler that drives all probing.
pub struct Scheduler {
    domains: Arc<HashMap<String, Domain>>,
    targets: Arc<RwLock<Vec<Target>>>,
    store: ResultStore,
    interval: Duration,
    client: reqwest::Client,
}

impl Scheduler {
    /// Create a scheduler over the shared target list and result store.
    pub fn new(
        domains: Arc<HashMap<String, Domain>>,
        targets: Arc<RwLock<Vec<Target>>>,
        store: ResultStore,
        configured_interval_secs: u64,
    ) -> Result<Self, ProbeError> {
        Ok(Self {
            domains,
            targets,
            store,
            interval: poll_interval(configured_interval_secs),
            client: probe::new_client()?,
        })
    }

    /// Spawn the polling loop as a background task.
    pub fn start(self: Arc<Self>) {
        tokio::spawn(async move {
            self.run().await;
        });
    }

    async fn run(self: Arc<Self>) {
        tracing::info!("Scheduler: polling every {:?}", self.interval);

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// Run one full probing cycle across all targets.
    ///
    /// Returns only after every probe launched this cycle has resolved,
    /// successfully or not.
    pub async fn tick(&self) {
        let targets = self.targets.read().await.clone();
        let mut probes = JoinSet::new();

        for target in targets {
            let Some(domain) = self.domains.get(&target.domain_key) else {
                tracing::warn!("Scheduler: can't locate domain {}", target.domain_key);
                continue;
            };

            let url = format!("{}://{}{}", domain.scheme, domain.host, target.path);
            let headers = domain.headers.clone();
            let client = self.client.clone();
            let store = self.store.clone();

            probes.spawn(async move {
                let issued = Utc::now();

                let status = match probe::probe(
                    &client,
                    &target.method,
                    &url,
                    target.content_type.as_deref(),
                    target.body.as_deref(),
                    &headers,
                )
                .await
                {
                    Ok(code) => i32::from(code),
                    Err(e) => {
                        tracing::warn!("Scheduler: probe {} failed: {}", url, e);
                        NO_RESPONSE_STATUS
                    }
                };

                let result = ProbeResult {
                    index: target.index,
                    label: target.label(),
                    status,
                    probed_at: issued,
                };
                store.record(target.key(), result).await;
            });
        }

        // Tick barrier: join every probe before the next cycle may start.
        while let Some(joined) = probes.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Scheduler: probe task panicked: {e}");
            }
        }
    }
}
