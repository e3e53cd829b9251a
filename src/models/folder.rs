use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sync state of a folder as reported to dashboard clients.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FolderState {
    Idle,
    Scanning,
    ScanWaiting,
    SyncWaiting,
    SyncPreparing,
    Syncing,
    Cleaning,
    CleanWaiting,
    Paused,
    Error,
    #[default]
    Unknown,
}

impl FolderState {
    /// Derives the state from the database status and the folder's paused flag.
    /// A paused folder is always `Paused`, whatever the daemon is doing.
    pub fn from_upstream(paused: bool, state: &str) -> Self {
        if paused {
            return FolderState::Paused;
        }

        match state.trim().to_ascii_lowercase().as_str() {
            "idle" => FolderState::Idle,
            "scanning" => FolderState::Scanning,
            "scan-waiting" => FolderState::ScanWaiting,
            "sync-waiting" => FolderState::SyncWaiting,
            "sync-preparing" => FolderState::SyncPreparing,
            "syncing" => FolderState::Syncing,
            "cleaning" => FolderState::Cleaning,
            "clean-waiting" => FolderState::CleanWaiting,
            "paused" => FolderState::Paused,
            "error" => FolderState::Error,
            _ => FolderState::Unknown,
        }
    }
}

/// Folder information for dashboard display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderStatus {
    pub id: String,
    pub label: String,
    pub path: String,
    pub state: FolderState,
    pub global_files: i64,
    pub local_files: i64,
    pub global_bytes: i64,
    pub local_bytes: i64,
    pub need_items: i64,
    pub need_bytes: i64,
    pub local_changes_items: i64,
    /// Only present when the daemon reported a value within `[0, 100]`.
    pub completion_pct: Option<f64>,
    pub last_scan_at: Option<DateTime<Utc>>,
}

impl FolderStatus {
    pub fn is_out_of_sync(&self) -> bool {
        self.need_items > 0 || self.need_bytes > 0
    }
}
