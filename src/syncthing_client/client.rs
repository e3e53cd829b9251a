use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::config::UpstreamConfig;
use crate::types::DashboardError;

use super::api::{
    DbCompletion, DbStatus, DeviceStats, FolderQuery, FolderStats, SyncthingConfig,
    SystemConnections, SystemStatus, SystemVersion,
};
use super::helpers::{truncate_body, ERROR_BODY_LIMIT};

/// The only REST paths this client will ever request.
pub const ALLOWED_READ_PATHS: &[&str] = &[
    "/rest/system/status",
    "/rest/system/version",
    "/rest/system/connections",
    "/rest/stats/device",
    "/rest/stats/folder",
    "/rest/config",
    "/rest/db/status",
    "/rest/db/completion",
];

/// Read-only view of the Syncthing REST API consumed by the collector.
#[async_trait]
pub trait SyncthingApi: Send + Sync {
    async fn system_status(&self) -> Result<SystemStatus, DashboardError>;
    async fn system_version(&self) -> Result<SystemVersion, DashboardError>;
    async fn system_connections(&self) -> Result<SystemConnections, DashboardError>;
    async fn device_stats(&self) -> Result<HashMap<String, DeviceStats>, DashboardError>;
    async fn folder_stats(&self) -> Result<HashMap<String, FolderStats>, DashboardError>;
    async fn config(&self) -> Result<SyncthingConfig, DashboardError>;
    async fn db_status(&self, folder_id: &str) -> Result<DbStatus, DashboardError>;
    async fn db_completion(&self, folder_id: &str) -> Result<DbCompletion, DashboardError>;
}

/// Strict read-only Syncthing API client.
#[derive(Clone)]
pub struct SyncthingClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl SyncthingClient {
    /// Prepare an HTTP client for the configured Syncthing instance.
    pub fn new(upstream: &UpstreamConfig) -> Result<Self, DashboardError> {
        let http = Client::builder()
            .timeout(upstream.timeout)
            .danger_accept_invalid_certs(upstream.insecure_skip_verify)
            .build()
            .map_err(DashboardError::Http)?;

        Ok(Self {
            api_key: upstream.api_key.clone(),
            http,
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, DashboardError>
    where
        T: DeserializeOwned,
    {
        self.get_json_with_query(path, &()).await
    }

    async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, DashboardError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        if !ALLOWED_READ_PATHS.contains(&path) {
            warn!(path, "Refusing request outside the read-only allow-list");
            return Err(DashboardError::PathNotAllowed(path.to_string()));
        }

        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self
            .http
            .get(url)
            .header("X-API-Key", &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(DashboardError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::Syncthing(format!(
                "request {} failed with status {}: {}",
                path,
                status.as_u16(),
                truncate_body(&body, ERROR_BODY_LIMIT)
            )));
        }

        let bytes = response.bytes().await.map_err(DashboardError::Http)?;
        serde_json::from_slice(&bytes).map_err(|source| DashboardError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl SyncthingApi for SyncthingClient {
    async fn system_status(&self) -> Result<SystemStatus, DashboardError> {
        self.get_json("/rest/system/status").await
    }

    async fn system_version(&self) -> Result<SystemVersion, DashboardError> {
        self.get_json("/rest/system/version").await
    }

    async fn system_connections(&self) -> Result<SystemConnections, DashboardError> {
        self.get_json("/rest/system/connections").await
    }

    async fn device_stats(&self) -> Result<HashMap<String, DeviceStats>, DashboardError> {
        self.get_json("/rest/stats/device").await
    }

    async fn folder_stats(&self) -> Result<HashMap<String, FolderStats>, DashboardError> {
        self.get_json("/rest/stats/folder").await
    }

    async fn config(&self) -> Result<SyncthingConfig, DashboardError> {
        self.get_json("/rest/config").await
    }

    async fn db_status(&self, folder_id: &str) -> Result<DbStatus, DashboardError> {
        let query = FolderQuery { folder: folder_id };
        self.get_json_with_query("/rest/db/status", &query).await
    }

    async fn db_completion(&self, folder_id: &str) -> Result<DbCompletion, DashboardError> {
        let query = FolderQuery { folder: folder_id };
        self.get_json_with_query("/rest/db/completion", &query).await
    }
}
