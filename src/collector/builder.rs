use chrono::{DateTime, Utc};

use crate::models::{
    derive_alerts, DashboardSnapshot, DeviceStatus, FolderState, FolderStatus,
    RemoteDeviceStatus,
};
use crate::syncthing_client::{parse_syncthing_time, ConfigDevice, ConfigFolder, DbStatus};

use super::aggregator::UpstreamSample;
use super::health::{discovery_health, service_health};
use super::rates::TransferRates;

/// Normalizes one poll cycle's payloads into a healthy snapshot.
pub fn build_snapshot(
    sample: &UpstreamSample,
    now: DateTime<Utc>,
    rates: TransferRates,
) -> DashboardSnapshot {
    let folders = build_folders(sample);
    let remotes = build_remotes(sample);
    let device = build_device(sample, rates);
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

fn build_device(sample: &UpstreamSample, rates: TransferRates) -> DeviceStatus {
    let local_id = sample.status.my_id.as_str();
    let name = sample
        .config
        .devices
        .iter()
        .find(|device| device.device_id == local_id)
        .and_then(|device| non_blank(&device.name))
        .unwrap_or(local_id)
        .to_string();

    let version = [
        sample.version.version.as_str(),
        sample.version.os.as_str(),
        sample.version.arch.as_str(),
    ]
    .iter()
    .filter_map(|part| non_blank(part))
    .collect::<Vec<_>>()
    .join(" ");

    let mut device = DeviceStatus {
        name,
        id: local_id.to_string(),
        version,
        uptime_s: sample.status.uptime,
        download_bps: rates.download_bps,
        upload_bps: rates.upload_bps,
        ..Default::default()
    };

    for status in sample.db_status.values() {
        device.local_files_total += status.local_files;
        device.local_dirs_total += status.local_directories;
        device.local_bytes_total += status.local_bytes;
    }

    device.set_listeners(service_health(&sample.status.connection_service_status));
    device.set_discovery(discovery_health(&sample.status));
    device
}

fn build_folders(sample: &UpstreamSample) -> Vec<FolderStatus> {
    let empty = DbStatus::default();
    let mut folders: Vec<FolderStatus> = sample
        .config
        .folders
        .iter()
        .map(|folder| {
            let db = sample.db_status.get(&folder.id).unwrap_or(&empty);
            build_folder(sample, folder, db)
        })
        .collect();

    folders.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
    folders
}

fn build_folder(sample: &UpstreamSample, folder: &ConfigFolder, db: &DbStatus) -> FolderStatus {
    let completion = sample.completion.get(&folder.id);

    let (need_items, need_bytes) = match completion {
        Some(completion) => (completion.need_items, completion.need_bytes),
        None => (db.need_items(), db.need_bytes),
    };
    let global_bytes = completion
        .map(|completion| completion.global_bytes.max(db.global_bytes))
        .unwrap_or(db.global_bytes);
    // Out-of-range completion means the daemon has no reliable figure yet.
    let completion_pct = completion
        .map(|completion| completion.completion)
        .filter(|pct| (0.0..=100.0).contains(pct));

    FolderStatus {
        id: folder.id.clone(),
        label: non_blank(&folder.label).unwrap_or(&folder.id).to_string(),
        path: folder.path.clone(),
        state: FolderState::from_upstream(folder.paused, &db.state),
        global_files: db.global_files,
        local_files: db.local_files,
        global_bytes,
        local_bytes: db.local_bytes,
        need_items: need_items.max(0),
        need_bytes: need_bytes.max(0),
        local_changes_items: db.receive_only_total_items,
        completion_pct,
        last_scan_at: sample
            .folder_stats
            .get(&folder.id)
            .and_then(|stats| parse_syncthing_time(&stats.last_scan)),
    }
}

fn build_remotes(sample: &UpstreamSample) -> Vec<RemoteDeviceStatus> {
    let local_id = sample.status.my_id.as_str();
    let mut remotes: Vec<RemoteDeviceStatus> = sample
        .config
        .devices
        .iter()
        .filter(|device| device.device_id != local_id)
        .map(|device| build_remote(sample, device))
        .collect();

    remotes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    remotes
}

fn build_remote(sample: &UpstreamSample, device: &ConfigDevice) -> RemoteDeviceStatus {
    let connection = sample.connections.connections.get(&device.device_id);

    RemoteDeviceStatus {
        id: device.device_id.clone(),
        name: non_blank(&device.name)
            .unwrap_or(&device.device_id)
            .to_string(),
        connected: connection.map(|c| c.connected).unwrap_or(false),
        address: connection.map(|c| c.address.clone()).unwrap_or_default(),
        last_seen_at: sample
            .device_stats
            .get(&device.device_id)
            .and_then(|stats| parse_syncthing_time(&stats.last_seen)),
        in_bytes_total: connection.map(|c| c.in_bytes_total).unwrap_or(0),
        out_bytes_total: connection.map(|c| c.out_bytes_total).unwrap_or(0),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
