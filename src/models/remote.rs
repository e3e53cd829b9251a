use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connection state of a configured remote device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDeviceStatus {
    pub id: String,
    pub name: String,
    pub connected: bool,
    pub address: String,
    pub last_seen_at: Option<DateTime<Utc>>,
    /// Cumulative counters as reported by the daemon, not rates.
    pub in_bytes_total: i64,
    pub out_bytes_total: i64,
}
