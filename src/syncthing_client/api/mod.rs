mod queries;
mod types;

pub use queries::FolderQuery;
pub use types::{
    ConfigDevice, ConfigFolder, ConnectionDetails, ConnectionTotals, DbCompletion, DbStatus,
    DeviceStats, FolderStats, ServiceStatus, SyncthingConfig, SystemConnections, SystemStatus,
    SystemVersion,
};
