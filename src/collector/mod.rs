//! Live snapshot collection against a Syncthing instance.
//!
//! The collector polls the REST API on a fixed interval, normalizes each
//! successful cycle into a [`DashboardSnapshot`] and falls back to the last
//! good snapshot, flagged offline, when a cycle fails.

mod aggregator;
mod builder;
mod health;
mod rates;

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::DashboardSnapshot;
use crate::service::{SnapshotReader, SnapshotService};
use crate::syncthing_client::SyncthingApi;

pub use aggregator::{DataAggregator, UpstreamSample};
pub use builder::build_snapshot;
pub use rates::{RateTracker, TransferRates};

/// Publication state of the collector.
#[derive(Debug, Clone, Default)]
enum CollectorState {
    #[default]
    NeverPolled,
    /// The most recent poll succeeded.
    Healthy(Arc<DashboardSnapshot>),
    /// The most recent poll failed after at least one success.
    Degraded {
        current: Arc<DashboardSnapshot>,
        last_good: Arc<DashboardSnapshot>,
    },
    /// Every poll so far has failed.
    Failing(Arc<DashboardSnapshot>),
}

impl CollectorState {
    fn current(&self) -> Option<&Arc<DashboardSnapshot>> {
        match self {
            CollectorState::NeverPolled => None,
            CollectorState::Healthy(snapshot) | CollectorState::Failing(snapshot) => Some(snapshot),
            CollectorState::Degraded { current, .. } => Some(current),
        }
    }

    fn last_good(&self) -> Option<&Arc<DashboardSnapshot>> {
        match self {
            CollectorState::Healthy(snapshot) => Some(snapshot),
            CollectorState::Degraded { last_good, .. } => Some(last_good),
            CollectorState::NeverPolled | CollectorState::Failing(_) => None,
        }
    }

    fn is_offline(&self) -> bool {
        matches!(
            self,
            CollectorState::Degraded { .. } | CollectorState::Failing(_)
        )
    }
}

/// Keeps an in-memory snapshot of a Syncthing instance refreshed on an interval.
pub struct Collector {
    api: Arc<dyn SyncthingApi>,
    poll_interval: Duration,
    state: RwLock<CollectorState>,
    rates: Mutex<RateTracker>,
}

impl Collector {
    pub fn new(api: Arc<dyn SyncthingApi>, poll_interval: Duration) -> Self {
        Self {
            api,
            poll_interval,
            state: RwLock::new(CollectorState::default()),
            rates: Mutex::new(RateTracker::new()),
        }
    }

    fn read_state(&self) -> CollectorState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, next: CollectorState) -> CollectorState {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *state, next)
    }

    fn publish_success(&self, sample: &UpstreamSample) {
        let now = Utc::now();
        let rates = self
            .rates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sample(&sample.connections.total, now);
        let snapshot = Arc::new(build_snapshot(sample, now, rates));
        let folders = snapshot.folders.len();
        let remotes = snapshot.remotes.len();

        let previous = self.publish(CollectorState::Healthy(snapshot));
        if previous.is_offline() {
            info!("Syncthing API reachable again");
        }
        debug!(folders, remotes, "Published snapshot");
    }

    fn publish_failure(&self, error: String) {
        let next = match self.read_state().last_good() {
            Some(last_good) => CollectorState::Degraded {
                current: Arc::new(last_good.degraded(error)),
                last_good: Arc::clone(last_good),
            },
            None => CollectorState::Failing(Arc::new(DashboardSnapshot::unreachable(
                Utc::now(),
                error,
            ))),
        };
        self.publish(next);
    }
}

impl SnapshotReader for Collector {
    fn snapshot(&self) -> Option<DashboardSnapshot> {
        let current = self.read_state().current().cloned()?;
        Some(current.read_at(Utc::now(), self.poll_interval))
    }

    fn ready(&self) -> bool {
        self.read_state().current().is_some()
    }
}

#[async_trait]
impl SnapshotService for Collector {
    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    async fn refresh(&self) {
        let started = Instant::now();
        match DataAggregator::new(self.api.as_ref()).collect().await {
            Ok(sample) => self.publish_success(&sample),
            Err(err) => {
                warn!(error = %err, "Failed to collect Syncthing status");
                self.publish_failure(err.to_string());
            }
        }
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Poll cycle finished");
    }
}
