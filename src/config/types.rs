use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the dashboard service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream connection settings; `None` runs the synthetic demo source.
    pub syncthing: Option<UpstreamConfig>,
    pub poll_interval: Duration,
    pub listen_address: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub page_title: String,
    pub page_subtitle: String,
    pub web_dir: PathBuf,
}

/// Connection settings for the Syncthing REST API.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub insecure_skip_verify: bool,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            syncthing: None,
            poll_interval: default_poll_interval(),
            listen_address: default_listen_address(),
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(10),
            page_title: "Syncthing".to_string(),
            page_subtitle: "Read-Only Dashboard".to_string(),
            web_dir: PathBuf::from("web"),
        }
    }
}

pub(super) fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

pub(super) fn default_upstream_timeout() -> Duration {
    Duration::from_secs(8)
}

fn default_listen_address() -> String {
    ":8080".to_string()
}

impl Config {
    pub fn demo_mode(&self) -> bool {
        self.syncthing.is_none()
    }

    /// Socket address to bind. A bare `:port` listens on all interfaces.
    pub fn bind_address(&self) -> Result<SocketAddr, crate::types::DashboardError> {
        let address = if self.listen_address.starts_with(':') {
            format!("0.0.0.0{}", self.listen_address)
        } else {
            self.listen_address.clone()
        };
        address.parse().map_err(|err| {
            crate::types::DashboardError::Config(format!(
                "invalid listen address {:?}: {err}",
                self.listen_address
            ))
        })
    }

    /// Upper bound applied to a single HTTP request.
    pub fn request_timeout(&self) -> Duration {
        self.read_timeout.max(self.write_timeout)
    }
}
