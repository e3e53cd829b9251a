use std::collections::HashMap;

use crate::syncthing_client::{
    DbCompletion, DbStatus, DeviceStats, FolderStats, SyncthingApi, SyncthingConfig,
    SystemConnections, SystemStatus, SystemVersion,
};
use crate::types::DashboardError;

/// Every upstream payload needed for one poll cycle.
#[derive(Debug, Clone, Default)]
pub struct UpstreamSample {
    pub status: SystemStatus,
    pub version: SystemVersion,
    pub connections: SystemConnections,
    pub device_stats: HashMap<String, DeviceStats>,
    pub folder_stats: HashMap<String, FolderStats>,
    pub config: SyncthingConfig,
    pub db_status: HashMap<String, DbStatus>,
    pub completion: HashMap<String, DbCompletion>,
}

/// Fetches the endpoints of a single poll cycle.
pub struct DataAggregator<'a> {
    api: &'a dyn SyncthingApi,
}

impl<'a> DataAggregator<'a> {
    pub fn new(api: &'a dyn SyncthingApi) -> Self {
        Self { api }
    }

    /// Fetches system status, config and per-folder database state.
    /// Any failing call fails the whole sample.
    pub async fn collect(&self) -> Result<UpstreamSample, DashboardError> {
        let status = self.api.system_status().await?;
        let version = self.api.system_version().await?;
        let connections = self.api.system_connections().await?;
        let device_stats = self.api.device_stats().await?;
        let folder_stats = self.api.folder_stats().await?;
        let config = self.api.config().await?;

        let mut db_status = HashMap::with_capacity(config.folders.len());
        let mut completion = HashMap::with_capacity(config.folders.len());
        for folder in &config.folders {
            let status = self.api.db_status(&folder.id).await.map_err(|err| {
                DashboardError::Syncthing(format!("get db status for folder {}: {err}", folder.id))
            })?;
            db_status.insert(folder.id.clone(), status);
        }
        for folder in &config.folders {
            let folder_completion = self.api.db_completion(&folder.id).await.map_err(|err| {
                DashboardError::Syncthing(format!(
                    "get db completion for folder {}: {err}",
                    folder.id
                ))
            })?;
            completion.insert(folder.id.clone(), folder_completion);
        }

        Ok(UpstreamSample {
            status,
            version,
            connections,
            device_stats,
            folder_stats,
            config,
            db_status,
            completion,
        })
    }
}
