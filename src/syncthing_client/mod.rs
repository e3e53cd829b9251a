mod api;
mod client;
mod helpers;

pub use api::{
    ConfigDevice, ConfigFolder, ConnectionDetails, ConnectionTotals, DbCompletion, DbStatus,
    DeviceStats, FolderQuery, FolderStats, ServiceStatus, SyncthingConfig, SystemConnections,
    SystemStatus, SystemVersion,
};
pub use client::{SyncthingApi, SyncthingClient, ALLOWED_READ_PATHS};
pub use helpers::parse_syncthing_time;
