use serde::{Deserialize, Serialize};

/// Status of the local Syncthing instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub name: String,
    pub id: String,
    pub version: String,
    pub uptime_s: i64,
    pub download_bps: f64,
    pub upload_bps: f64,
    pub local_files_total: i64,
    pub local_dirs_total: i64,
    pub local_bytes_total: i64,
    pub listeners_ok: usize,
    pub listeners_total: usize,
    pub discovery_ok: usize,
    pub discovery_total: usize,
}

/// `(ok, total)` summary of a set of named subsystem checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthRatio {
    pub ok: usize,
    pub total: usize,
}

impl HealthRatio {
    pub fn new(ok: usize, total: usize) -> Self {
        Self { ok, total }
    }
}

impl DeviceStatus {
    pub fn set_listeners(&mut self, ratio: HealthRatio) {
        self.listeners_ok = ratio.ok;
        self.listeners_total = ratio.total;
    }

    pub fn set_discovery(&mut self, ratio: HealthRatio) {
        self.discovery_ok = ratio.ok;
        self.discovery_total = ratio.total;
    }
}
