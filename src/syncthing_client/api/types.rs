use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Syncthing sends `null` for empty maps and lists in several payloads.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `/rest/system/status`
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    #[serde(default, rename = "myID")]
    pub my_id: String,
    #[serde(default)]
    pub uptime: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connection_service_status: HashMap<String, ServiceStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub discovery_status: HashMap<String, ServiceStatus>,
    #[serde(default)]
    pub discovery_methods: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub discovery_errors: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceStatus {
    #[serde(default)]
    pub error: Option<String>,
}

impl ServiceStatus {
    pub fn is_ok(&self) -> bool {
        self.error
            .as_deref()
            .map(|error| error.trim().is_empty())
            .unwrap_or(true)
    }
}

/// `/rest/system/version`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SystemVersion {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub arch: String,
}

/// `/rest/system/connections`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SystemConnections {
    #[serde(default)]
    pub total: ConnectionTotals,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: HashMap<String, ConnectionDetails>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTotals {
    #[serde(default)]
    pub in_bytes_total: i64,
    #[serde(default)]
    pub out_bytes_total: i64,
    #[serde(default)]
    pub bits_per_second_in: f64,
    #[serde(default)]
    pub bits_per_second_out: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub in_bytes_total: i64,
    #[serde(default)]
    pub out_bytes_total: i64,
}

/// Entry of `/rest/stats/device`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_seen: String,
}

/// Entry of `/rest/stats/folder`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct FolderStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_scan: String,
}

/// `/rest/config`, reduced to the parts the dashboard reads.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SyncthingConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<ConfigDevice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub folders: Vec<ConfigFolder>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigDevice {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigFolder {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default)]
    pub paused: bool,
}

/// `/rest/db/status?folder=<id>`
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DbStatus {
    #[serde(default)]
    pub global_files: i64,
    #[serde(default)]
    pub global_bytes: i64,
    #[serde(default)]
    pub local_files: i64,
    #[serde(default)]
    pub local_directories: i64,
    #[serde(default)]
    pub local_bytes: i64,
    #[serde(default)]
    pub need_files: i64,
    #[serde(default)]
    pub need_directories: i64,
    #[serde(default)]
    pub need_symlinks: i64,
    #[serde(default)]
    pub need_deletes: i64,
    #[serde(default)]
    pub need_bytes: i64,
    #[serde(default)]
    pub need_total_items: i64,
    #[serde(default)]
    pub receive_only_total_items: i64,
    #[serde(default)]
    pub receive_only_changed_bytes: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
}

impl DbStatus {
    /// Outstanding items, preferring the daemon's own total.
    pub fn need_items(&self) -> i64 {
        if self.need_total_items > 0 {
            return self.need_total_items;
        }
        self.need_files + self.need_directories + self.need_symlinks + self.need_deletes
    }
}

/// `/rest/db/completion?folder=<id>`
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DbCompletion {
    #[serde(default)]
    pub completion: f64,
    #[serde(default)]
    pub need_bytes: i64,
    #[serde(default)]
    pub need_items: i64,
    #[serde(default)]
    pub global_bytes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_status_tolerates_nulls() {
        let status: SystemStatus = serde_json::from_str(
            r#"{"myID":"LOCAL-1","uptime":5,"connectionServiceStatus":null,"discoveryErrors":null}"#,
        )
        .unwrap();
        assert_eq!(status.my_id, "LOCAL-1");
        assert!(status.connection_service_status.is_empty());
        assert!(status.discovery_status.is_empty());
        assert!(status.discovery_errors.is_empty());
    }

    #[test]
    fn test_service_status_blank_error_is_ok() {
        let ok: ServiceStatus = serde_json::from_str(r#"{"error":null}"#).unwrap();
        let blank: ServiceStatus = serde_json::from_str(r#"{"error":"  "}"#).unwrap();
        let failed: ServiceStatus = serde_json::from_str(r#"{"error":"bind failed"}"#).unwrap();
        assert!(ok.is_ok());
        assert!(blank.is_ok());
        assert!(!failed.is_ok());
    }

    #[test]
    fn test_db_status_need_items_fallback() {
        let status = DbStatus {
            need_files: 3,
            need_directories: 1,
            need_deletes: 2,
            ..Default::default()
        };
        assert_eq!(status.need_items(), 6);

        let status = DbStatus {
            need_total_items: 9,
            need_files: 3,
            ..Default::default()
        };
        assert_eq!(status.need_items(), 9);
    }
}
