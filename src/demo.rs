//! Synthetic data source used when no Syncthing instance is configured.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::{
    derive_alerts, DashboardSnapshot, DeviceStatus, FolderState, FolderStatus, HealthRatio,
    RemoteDeviceStatus,
};
use crate::service::{SnapshotReader, SnapshotService};

const KIB: i64 = 1024;
const MIB: i64 = 1024 * KIB;
const GIB: i64 = 1024 * MIB;

const DEMO_UPTIME_HOURS: i64 = 73;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FolderMode {
    Idle,
    LocalChanges,
    Syncing,
    Scanning,
    Paused,
    Error,
}

struct FolderSeed {
    id: &'static str,
    label: &'static str,
    mode: FolderMode,
    global_files: i64,
    global_bytes: i64,
    base_progress: f64,
    speed: usize,
    local_changes: i64,
}

const fn folder(
    id: &'static str,
    label: &'static str,
    mode: FolderMode,
    global_files: i64,
    global_bytes: i64,
    base_progress: f64,
    speed: usize,
    local_changes: i64,
) -> FolderSeed {
    FolderSeed {
        id,
        label,
        mode,
        global_files,
        global_bytes,
        base_progress,
        speed,
        local_changes,
    }
}

const FOLDER_SEEDS: [FolderSeed; 10] = [
    folder("folder-pictures", "Pictures", FolderMode::LocalChanges, 182, 136 * GIB, 100.0, 0, 9),
    folder("folder-documents", "Documents", FolderMode::Idle, 96, 42 * GIB, 100.0, 0, 0),
    folder("folder-media", "Media", FolderMode::Syncing, 214, 328 * GIB, 35.0, 3, 0),
    folder("folder-music", "Music", FolderMode::Syncing, 484, 78 * GIB, 64.0, 4, 0),
    folder("folder-videos", "Videos", FolderMode::Error, 33, 512 * GIB, 73.0, 0, 0),
    folder("folder-downloads", "Downloads", FolderMode::Scanning, 127, 58 * GIB, 100.0, 0, 0),
    folder("folder-projects", "Projects", FolderMode::Syncing, 71, 24 * GIB, 12.0, 5, 0),
    folder("folder-backups", "Backups", FolderMode::Paused, 65, 910 * GIB, 100.0, 0, 0),
    folder("folder-books", "Books", FolderMode::LocalChanges, 143, 19 * GIB, 100.0, 0, 3),
    folder("folder-taxes", "Taxes", FolderMode::Idle, 22, 4 * GIB, 100.0, 0, 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Up,
    Flapping,
    Down,
}

struct RemoteSeed {
    id: &'static str,
    name: &'static str,
    address: &'static str,
    link: Link,
}

const REMOTE_SEEDS: [RemoteSeed; 4] = [
    RemoteSeed {
        id: "ATTIC-DEMO-J24XQXQ-HC2SY5M-NUQ6R7L-W7K6WTV-J5Z62DW-ZZQKAMA-2YBDAQH",
        name: "Attic",
        address: "192.168.10.24:22000",
        link: Link::Up,
    },
    RemoteSeed {
        id: "DESK-DEMO-J24XQXQ-HC2SY5M-NUQ6R7L-W7K6WTV-J5Z62DW-ZZQKAMA-2YBDAQH",
        name: "Desk",
        address: "192.168.10.42:22000",
        link: Link::Up,
    },
    RemoteSeed {
        id: "BACKPACK-DEMO-J24XQXQ-HC2SY5M-NUQ6R7L-W7K6WTV-J5Z62DW-ZZQKAMA-2YBDAQH",
        name: "Backpack",
        address: "100.88.14.7:22000",
        link: Link::Flapping,
    },
    RemoteSeed {
        id: "KEYRING-DEMO-J24XQXQ-HC2SY5M-NUQ6R7L-W7K6WTV-J5Z62DW-ZZQKAMA-2YBDAQH",
        name: "Keyring",
        address: "10.8.0.18:22000",
        link: Link::Down,
    },
];

#[derive(Debug, Default)]
struct DemoState {
    snapshot: Option<DashboardSnapshot>,
    tick: usize,
}

/// Produces deterministic, slowly changing snapshots for demonstration mode.
pub struct DemoCollector {
    poll_interval: Duration,
    started_at: DateTime<Utc>,
    state: RwLock<DemoState>,
}

impl DemoCollector {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            started_at: Utc::now() - chrono::Duration::hours(DEMO_UPTIME_HOURS),
            state: RwLock::new(DemoState::default()),
        }
    }
}

impl SnapshotReader for DemoCollector {
    fn snapshot(&self) -> Option<DashboardSnapshot> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .snapshot
            .as_ref()
            .map(|snapshot| snapshot.read_at(Utc::now(), self.poll_interval))
    }

    fn ready(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .is_some()
    }
}

#[async_trait]
impl SnapshotService for DemoCollector {
    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    async fn refresh(&self) {
        let now = Utc::now();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let snapshot = synthesize(now, state.tick, self.started_at, self.poll_interval);
        state.snapshot = Some(snapshot);
        state.tick += 1;
        debug!(tick = state.tick, "Published demo snapshot");
    }
}

fn synthesize(
    now: DateTime<Utc>,
    tick: usize,
    started_at: DateTime<Utc>,
    poll_interval: Duration,
) -> DashboardSnapshot {
    let folders = demo_folders(now, tick);
    let remotes = demo_remotes(now, tick);
    let device = demo_device(now, tick, started_at, poll_interval, &folders);
    let alerts = derive_alerts(&remotes, &folders);

    DashboardSnapshot {
        generated_at: now,
        source_online: true,
        source_error: None,
        device,
        folders,
        remotes,
        alerts,
        stale: false,
    }
}

fn demo_device(
    now: DateTime<Utc>,
    tick: usize,
    started_at: DateTime<Utc>,
    poll_interval: Duration,
    folders: &[FolderStatus],
) -> DeviceStatus {
    let local_files_total = folders.iter().map(|f| f.local_files).sum();
    let local_dirs_total = folders.iter().map(|f| (f.local_files / 2).max(1)).sum();
    let local_bytes_total = folders.iter().map(|f| f.local_bytes).sum();

    let uptime = now.signed_duration_since(started_at).num_seconds()
        + (tick as f64 * poll_interval.as_secs_f64()) as i64;

    let listeners_ok = if tick % 23 >= 19 { 1 } else { 2 };
    let discovery_ok = if tick % 19 == 0 { 3 } else { 4 };

    let mut device = DeviceStatus {
        name: "Homelab".to_string(),
        id: "HOMELAB-DEMO-A4M9QY7-TK2N6PT-MV7R2FD-GQ9Y1LK-R8SN4WU-CP6E2JD-7YQ4HTA".to_string(),
        version: "v2.0.12 linux amd64".to_string(),
        uptime_s: uptime,
        download_bps: (2.3 + ((tick * 3) % 10) as f64 / 10.0) * MIB as f64,
        upload_bps: (145.0 + ((tick * 17) % 115) as f64) * KIB as f64,
        local_files_total,
        local_dirs_total,
        local_bytes_total,
        ..Default::default()
    };
    device.set_listeners(HealthRatio::new(listeners_ok, 2));
    device.set_discovery(HealthRatio::new(discovery_ok, 5));
    device
}

fn demo_folders(now: DateTime<Utc>, tick: usize) -> Vec<FolderStatus> {
    FOLDER_SEEDS
        .iter()
        .enumerate()
        .map(|(idx, seed)| demo_folder(seed, idx, now, tick))
        .collect()
}

fn demo_folder(seed: &FolderSeed, idx: usize, now: DateTime<Utc>, tick: usize) -> FolderStatus {
    let mut folder = FolderStatus {
        id: seed.id.to_string(),
        label: seed.label.to_string(),
        path: format!("/sync/{}", seed.label),
        state: FolderState::Idle,
        global_files: seed.global_files,
        local_files: seed.global_files,
        global_bytes: seed.global_bytes,
        local_bytes: seed.global_bytes,
        need_items: 0,
        need_bytes: 0,
        local_changes_items: seed.local_changes,
        completion_pct: Some(100.0),
        last_scan_at: Some(now - chrono::Duration::minutes(((idx * 13 + tick) % 170) as i64)),
    };

    match seed.mode {
        FolderMode::Idle => {}
        FolderMode::LocalChanges => {
            folder.local_changes_items = (seed.local_changes + (tick % 3) as i64).max(1);
        }
        FolderMode::Syncing => {
            let mut progress = seed.base_progress + ((tick * seed.speed + idx) % 19) as f64;
            if progress > 96.0 {
                progress = 96.0 - ((tick + idx) % 7) as f64;
            }
            let progress = progress.max(1.0);
            let remaining = (100.0 - progress) / 100.0;

            folder.state = if tick % 11 == 0 && idx % 2 == 0 {
                FolderState::ScanWaiting
            } else {
                FolderState::Syncing
            };
            folder.completion_pct = Some(progress);
            folder.need_bytes = ((seed.global_bytes as f64 * remaining) as i64).max(64 * MIB);
            folder.local_bytes = (seed.global_bytes - folder.need_bytes).max(0);
            folder.need_items = ((seed.global_files as f64 * remaining) as i64).max(1);
            folder.local_files = (seed.global_files - folder.need_items / 2).max(0);
        }
        FolderMode::Scanning => folder.state = FolderState::ScanWaiting,
        FolderMode::Paused => folder.state = FolderState::Paused,
        FolderMode::Error => {
            folder.state = FolderState::Error;
            folder.completion_pct = Some(72.0);
            folder.need_bytes = (seed.global_bytes as f64 * 0.28) as i64;
            folder.need_items = (seed.global_files / 4).max(3);
            folder.local_bytes = (seed.global_bytes - folder.need_bytes).max(0);
        }
    }

    folder
}

fn demo_remotes(now: DateTime<Utc>, tick: usize) -> Vec<RemoteDeviceStatus> {
    REMOTE_SEEDS
        .iter()
        .enumerate()
        .map(|(idx, seed)| {
            let connected = match seed.link {
                Link::Up => true,
                Link::Down => false,
                Link::Flapping => tick % 7 > 1,
            };
            let minutes_ago = ((idx + 1) * (tick % 5 + 1)) as i64;
            let (idx, tick) = (idx as i64, tick as i64);

            RemoteDeviceStatus {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                connected,
                address: seed.address.to_string(),
                last_seen_at: Some(now - chrono::Duration::minutes(minutes_ago)),
                in_bytes_total: (120 + idx * 14) * GIB + tick * idx * 41 * MIB,
                out_bytes_total: (3 + idx) * GIB + tick * idx * 11 * MIB,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertCode;

    fn sample(tick: usize) -> DashboardSnapshot {
        let now = Utc::now();
        synthesize(
            now,
            tick,
            now - chrono::Duration::hours(DEMO_UPTIME_HOURS),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_ready_after_first_refresh() {
        let demo = DemoCollector::new(Duration::from_secs(5));
        assert!(!demo.ready());
        assert!(demo.snapshot().is_none());

        demo.refresh().await;
        assert!(demo.ready());

        let snapshot = demo.snapshot().expect("snapshot");
        assert!(snapshot.source_online);
        assert!(!snapshot.stale);
        assert_eq!(snapshot.folders.len(), 10);
        assert_eq!(snapshot.remotes.len(), 4);
        assert!(snapshot.device.uptime_s >= DEMO_UPTIME_HOURS * 3600);
    }

    #[test]
    fn test_mixed_folder_states() {
        let snapshot = sample(1);
        let states: Vec<FolderState> = snapshot.folders.iter().map(|f| f.state).collect();

        assert!(states.contains(&FolderState::Syncing));
        assert!(states.contains(&FolderState::Paused));
        assert!(states.contains(&FolderState::Error));
        assert!(states.contains(&FolderState::ScanWaiting));
        assert!(snapshot.folders.iter().any(|f| f.local_changes_items > 0));
        assert_eq!(snapshot.folders[0].path, "/sync/Pictures");
    }

    #[test]
    fn test_alerts_cover_down_remote_and_error_folder() {
        let snapshot = sample(3);

        assert!(snapshot.alerts.iter().any(|alert| {
            alert.code == AlertCode::RemoteDisconnected && alert.subject_id.starts_with("KEYRING")
        }));
        assert!(snapshot
            .alerts
            .iter()
            .any(|alert| alert.code == AlertCode::FolderError && alert.subject_id == "folder-videos"));
        assert!(!snapshot.alerts.iter().any(|alert| {
            alert.code == AlertCode::FolderOutOfSync && alert.subject_id == "folder-videos"
        }));
    }

    #[test]
    fn test_backpack_flaps() {
        let backpack = |tick| sample(tick).remotes[2].connected;
        assert!(!backpack(0));
        assert!(!backpack(1));
        assert!(backpack(2));
        assert!(backpack(6));
        assert!(!backpack(7));
    }

    #[test]
    fn test_values_stay_in_range() {
        for tick in 0..50 {
            let snapshot = sample(tick);
            for folder in &snapshot.folders {
                assert!(folder.need_items >= 0);
                assert!(folder.need_bytes >= 0);
                assert!(folder.local_bytes >= 0);
                let pct = folder.completion_pct.unwrap_or_default();
                assert!((0.0..=100.0).contains(&pct), "{} at tick {tick}", folder.id);
            }
            let device = &snapshot.device;
            assert!(device.listeners_ok <= device.listeners_total);
            assert!(device.discovery_ok <= device.discovery_total);
        }
    }

    #[tokio::test]
    async fn test_progress_moves_between_refreshes() {
        let demo = DemoCollector::new(Duration::from_secs(5));
        demo.refresh().await;
        let first = demo.snapshot().unwrap();
        demo.refresh().await;
        let second = demo.snapshot().unwrap();

        let media = |s: &DashboardSnapshot| s.folders[2].completion_pct;
        assert_ne!(media(&first), media(&second));
    }
}
