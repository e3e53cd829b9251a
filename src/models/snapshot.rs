use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Alert, DeviceStatus, FolderStatus, RemoteDeviceStatus};

/// One consistent, timestamped view of the Syncthing instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub source_online: bool,
    pub source_error: Option<String>,
    pub device: DeviceStatus,
    pub folders: Vec<FolderStatus>,
    pub remotes: Vec<RemoteDeviceStatus>,
    pub alerts: Vec<Alert>,
    pub stale: bool,
}

impl DashboardSnapshot {
    /// Placeholder published when the very first poll fails.
    pub fn unreachable(now: DateTime<Utc>, error: String) -> Self {
        Self {
            generated_at: now,
            source_online: false,
            source_error: Some(error),
            device: DeviceStatus::default(),
            folders: Vec::new(),
            remotes: Vec::new(),
            alerts: vec![Alert::source_unreachable()],
            stale: true,
        }
    }

    /// Copy of a known-good snapshot flagged as offline.
    /// Keeps its `generated_at` and prepends the unreachable alert.
    pub fn degraded(&self, error: String) -> Self {
        let mut alerts = Vec::with_capacity(self.alerts.len() + 1);
        alerts.push(Alert::source_unreachable());
        alerts.extend(self.alerts.iter().cloned());

        Self {
            source_online: false,
            source_error: Some(error),
            alerts,
            stale: true,
            ..self.clone()
        }
    }

    /// Whether the data is too old or offline at `now`.
    pub fn is_stale_at(&self, now: DateTime<Utc>, poll_interval: Duration) -> bool {
        if !self.source_online {
            return true;
        }
        let age = now.signed_duration_since(self.generated_at);
        match chrono::Duration::from_std(poll_interval * 2) {
            Ok(threshold) => age > threshold,
            Err(_) => false,
        }
    }

    /// Copy handed to readers, with staleness re-evaluated at `now`.
    pub fn read_at(&self, now: DateTime<Utc>, poll_interval: Duration) -> Self {
        let mut out = self.clone();
        out.stale = self.is_stale_at(now, poll_interval);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertCode;

    fn healthy(now: DateTime<Utc>) -> DashboardSnapshot {
        DashboardSnapshot {
            generated_at: now,
            source_online: true,
            source_error: None,
            device: DeviceStatus {
                name: "vault".to_string(),
                ..Default::default()
            },
            folders: Vec::new(),
            remotes: Vec::new(),
            alerts: Vec::new(),
            stale: false,
        }
    }

    #[test]
    fn test_stale_after_two_intervals() {
        let now = Utc::now();
        let snapshot = healthy(now - chrono::Duration::seconds(11));
        assert!(snapshot.is_stale_at(now, Duration::from_secs(5)));
        assert!(!snapshot.is_stale_at(now, Duration::from_secs(6)));
    }

    #[test]
    fn test_read_at_overrides_stored_flag() {
        let now = Utc::now();
        let mut snapshot = healthy(now);
        snapshot.stale = true;
        assert!(!snapshot.read_at(now, Duration::from_secs(5)).stale);
    }

    #[test]
    fn test_offline_is_always_stale() {
        let now = Utc::now();
        let snapshot = DashboardSnapshot::unreachable(now, "boom".to_string());
        assert!(snapshot.is_stale_at(now, Duration::from_secs(5)));
    }

    #[test]
    fn test_degraded_keeps_data_and_timestamp() {
        let generated = Utc::now() - chrono::Duration::seconds(3);
        let good = healthy(generated);
        let degraded = good.degraded("connection refused".to_string());

        assert_eq!(degraded.generated_at, generated);
        assert_eq!(degraded.device, good.device);
        assert!(!degraded.source_online);
        assert_eq!(degraded.source_error.as_deref(), Some("connection refused"));
        assert_eq!(degraded.alerts[0].code, AlertCode::SourceUnreachable);
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(healthy(Utc::now())).unwrap();
        for key in [
            "generated_at",
            "source_online",
            "source_error",
            "device",
            "folders",
            "remotes",
            "alerts",
            "stale",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value["source_error"].is_null());
    }
}
