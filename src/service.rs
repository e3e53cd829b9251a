use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::models::DashboardSnapshot;

/// What the HTTP layer needs from a snapshot producer.
pub trait SnapshotReader: Send + Sync {
    /// Current snapshot with staleness evaluated now; `None` until the
    /// first poll cycle has published anything.
    fn snapshot(&self) -> Option<DashboardSnapshot>;

    /// Whether any snapshot, healthy or degraded, has been published.
    fn ready(&self) -> bool;
}

/// A snapshot producer refreshed on a fixed interval.
#[async_trait]
pub trait SnapshotService: SnapshotReader + 'static {
    fn poll_interval(&self) -> Duration;

    /// Runs one collection cycle and publishes its outcome.
    async fn refresh(&self);
}

/// Runs one refresh immediately, then keeps refreshing every poll interval
/// on a background task until `shutdown` flips to `true` or its sender is
/// dropped. Cycles never overlap; a slow cycle delays the next tick.
pub async fn start<S>(service: Arc<S>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()>
where
    S: SnapshotService,
{
    service.refresh().await;

    let period = service.poll_interval();
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => service.refresh().await,
            }
        }

        debug!("Poll loop stopped");
    })
}
