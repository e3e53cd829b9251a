use serde::{Deserialize, Serialize};

use super::{FolderState, FolderStatus, RemoteDeviceStatus};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warn,
}

/// Stable machine-readable alert identifiers.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCode {
    SourceUnreachable,
    RemoteDisconnected,
    FolderError,
    FolderOutOfSync,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub code: AlertCode,
    pub message: String,
    pub subject_id: String,
}

impl Alert {
    /// Synthesized when the Syncthing API could not be polled.
    pub fn source_unreachable() -> Self {
        Self {
            severity: Severity::Critical,
            code: AlertCode::SourceUnreachable,
            message: "Syncthing API is unreachable".to_string(),
            subject_id: "syncthing".to_string(),
        }
    }
}

/// Derives alerts from the current remotes and folders.
///
/// Disconnected remotes come first, in remote order, followed by folder
/// alerts in folder order. A folder in error never also gets an
/// out-of-sync alert.
pub fn derive_alerts(remotes: &[RemoteDeviceStatus], folders: &[FolderStatus]) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for remote in remotes.iter().filter(|remote| !remote.connected) {
        alerts.push(Alert {
            severity: Severity::Critical,
            code: AlertCode::RemoteDisconnected,
            message: format!("Remote device {} is disconnected", remote.name),
            subject_id: remote.id.clone(),
        });
    }

    for folder in folders {
        if folder.state == FolderState::Error {
            alerts.push(Alert {
                severity: Severity::Critical,
                code: AlertCode::FolderError,
                message: format!("Folder {} reports error state", folder.label),
                subject_id: folder.id.clone(),
            });
            continue;
        }

        if folder.is_out_of_sync() {
            alerts.push(Alert {
                severity: Severity::Warn,
                code: AlertCode::FolderOutOfSync,
                message: format!("Folder {} has pending sync items", folder.label),
                subject_id: folder.id.clone(),
            });
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(id: &str, connected: bool) -> RemoteDeviceStatus {
        RemoteDeviceStatus {
            id: id.to_string(),
            name: id.to_lowercase(),
            connected,
            address: String::new(),
            last_seen_at: None,
            in_bytes_total: 0,
            out_bytes_total: 0,
        }
    }

    fn folder(id: &str, state: FolderState, need_items: i64) -> FolderStatus {
        FolderStatus {
            id: id.to_string(),
            label: id.to_string(),
            path: format!("/sync/{id}"),
            state,
            global_files: 0,
            local_files: 0,
            global_bytes: 0,
            local_bytes: 0,
            need_items,
            need_bytes: 0,
            local_changes_items: 0,
            completion_pct: None,
            last_scan_at: None,
        }
    }

    #[test]
    fn test_alert_order_remotes_then_folders() {
        let remotes = vec![remote("A", false), remote("B", true), remote("C", false)];
        let folders = vec![
            folder("docs", FolderState::Syncing, 4),
            folder("media", FolderState::Idle, 0),
            folder("video", FolderState::Error, 7),
        ];

        let alerts = derive_alerts(&remotes, &folders);
        let summary: Vec<(AlertCode, &str)> = alerts
            .iter()
            .map(|alert| (alert.code, alert.subject_id.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (AlertCode::RemoteDisconnected, "A"),
                (AlertCode::RemoteDisconnected, "C"),
                (AlertCode::FolderOutOfSync, "docs"),
                (AlertCode::FolderError, "video"),
            ]
        );
        assert_eq!(alerts[2].severity, Severity::Warn);
        assert_eq!(alerts[3].severity, Severity::Critical);
    }

    #[test]
    fn test_alert_wire_format() {
        let value = serde_json::to_value(Alert::source_unreachable()).unwrap();
        assert_eq!(value["severity"], "critical");
        assert_eq!(value["code"], "SOURCE_UNREACHABLE");
        assert_eq!(value["subject_id"], "syncthing");
    }
}
