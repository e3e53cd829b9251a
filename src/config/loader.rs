use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use tokio::fs;
use tracing::{info, warn};

use crate::types::DashboardError;

use super::types::{default_poll_interval, default_upstream_timeout};
use super::{Config, UpstreamConfig};

impl Config {
    /// Load configuration from the process environment.
    /// Without `SYNCTHING_BASE_URL` the dashboard runs in demo mode.
    pub async fn load() -> Result<Self, DashboardError> {
        let config = Self::from_lookup(|name| env::var(name).ok()).await?;
        info!(
            demo = config.demo_mode(),
            poll_interval = ?config.poll_interval,
            listen = %config.listen_address,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub async fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };
        let defaults = Config::default();

        let config = Config {
            syncthing: None,
            poll_interval: vars.duration("SYNCTHING_DASHBOARD_POLL_INTERVAL", default_poll_interval()),
            listen_address: vars.string("SYNCTHING_DASHBOARD_LISTEN_ADDRESS", &defaults.listen_address),
            read_timeout: vars.duration("SYNCTHING_DASHBOARD_READ_TIMEOUT", defaults.read_timeout),
            write_timeout: vars.duration("SYNCTHING_DASHBOARD_WRITE_TIMEOUT", defaults.write_timeout),
            page_title: vars.string("SYNCTHING_DASHBOARD_TITLE", &defaults.page_title),
            page_subtitle: vars.string("SYNCTHING_DASHBOARD_SUBTITLE", &defaults.page_subtitle),
            web_dir: vars
                .get("SYNCTHING_DASHBOARD_WEB_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.web_dir),
        };

        if config.poll_interval.is_zero() {
            return Err(DashboardError::Config(
                "SYNCTHING_DASHBOARD_POLL_INTERVAL must be > 0".to_string(),
            ));
        }

        let Some(base_url) = vars.get("SYNCTHING_BASE_URL") else {
            return Ok(config);
        };

        let parsed = Url::parse(&base_url).map_err(|_| {
            DashboardError::Config("SYNCTHING_BASE_URL must be a valid absolute URL".to_string())
        })?;
        if parsed.host_str().is_none() {
            return Err(DashboardError::Config(
                "SYNCTHING_BASE_URL must be a valid absolute URL".to_string(),
            ));
        }

        let api_key = load_api_key(&vars).await?;

        Ok(Config {
            syncthing: Some(UpstreamConfig {
                base_url: parsed.as_str().trim_end_matches('/').to_string(),
                api_key,
                timeout: vars.duration("SYNCTHING_TIMEOUT", default_upstream_timeout()),
                insecure_skip_verify: vars.bool("SYNCTHING_INSECURE_SKIP_VERIFY", false),
            }),
            ..config
        })
    }

    /// Convenience for tests and tooling that already hold the variables.
    pub async fn from_map(vars: &HashMap<String, String>) -> Result<Self, DashboardError> {
        Self::from_lookup(|name| vars.get(name).cloned()).await
    }
}

async fn load_api_key<F>(vars: &Vars<F>) -> Result<String, DashboardError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_key) = vars.get("SYNCTHING_API_KEY") {
        return Ok(api_key);
    }

    let secret_path = vars
        .get("SYNCTHING_API_KEY_FILE")
        .ok_or(DashboardError::MissingApiKey)?;

    let contents = fs::read_to_string(&secret_path).await.map_err(|err| {
        DashboardError::Config(format!("failed to read SYNCTHING_API_KEY_FILE: {err}"))
    })?;

    let api_key = contents.trim();
    if api_key.is_empty() {
        return Err(DashboardError::Config(
            "SYNCTHING_API_KEY_FILE is empty".to_string(),
        ));
    }

    Ok(api_key.to_string())
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed, non-empty value of a variable.
    fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn string(&self, name: &str, fallback: &str) -> String {
        self.get(name).unwrap_or_else(|| fallback.to_string())
    }

    fn duration(&self, name: &str, fallback: Duration) -> Duration {
        let Some(value) = self.get(name) else {
            return fallback;
        };
        match parse_duration(&value) {
            Some(parsed) => parsed,
            None => {
                warn!(variable = name, value = %value, "Ignoring unparseable duration");
                fallback
            }
        }
    }

    fn bool(&self, name: &str, fallback: bool) -> bool {
        let Some(value) = self.get(name) else {
            return fallback;
        };
        match value.to_ascii_lowercase().as_str() {
            "1" | "t" | "true" => true,
            "0" | "f" | "false" => false,
            _ => {
                warn!(variable = name, value = %value, "Ignoring unparseable boolean");
                fallback
            }
        }
    }
}

/// Parses `500ms`, `5s`, `1m30s`, `1.5h` style durations.
/// A bare integer is taken as seconds.
pub(crate) fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let mut total = 0f64;
    let mut rest = value;
    if rest.is_empty() {
        return None;
    }

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let number: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let seconds_per_unit = match &rest[..unit_len] {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return None,
        };
        rest = &rest[unit_len..];
        total += number * seconds_per_unit;
    }

    Duration::try_from_secs_f64(total).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_demo_mode_when_base_url_missing() {
        let config = Config::from_map(&vars(&[("SYNCTHING_BASE_URL", "")]))
            .await
            .unwrap();

        assert!(config.demo_mode());
        assert!(config.syncthing.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.page_title, "Syncthing");
        assert_eq!(config.page_subtitle, "Read-Only Dashboard");
    }

    #[tokio::test]
    async fn test_api_key_required_when_base_url_set() {
        let result = Config::from_map(&vars(&[("SYNCTHING_BASE_URL", "http://localhost:8384")])).await;
        assert!(matches!(result, Err(DashboardError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_reads_upstream_settings() {
        let config = Config::from_map(&vars(&[
            ("SYNCTHING_BASE_URL", "http://localhost:8384/"),
            ("SYNCTHING_API_KEY", " demo-key "),
            ("SYNCTHING_TIMEOUT", "3s"),
            ("SYNCTHING_INSECURE_SKIP_VERIFY", "true"),
        ]))
        .await
        .unwrap();

        let upstream = config.syncthing.expect("upstream settings");
        assert_eq!(upstream.base_url, "http://localhost:8384");
        assert_eq!(upstream.api_key, "demo-key");
        assert_eq!(upstream.timeout, Duration::from_secs(3));
        assert!(upstream.insecure_skip_verify);
    }

    #[tokio::test]
    async fn test_api_key_file_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file-key  ").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = Config::from_map(&vars(&[
            ("SYNCTHING_BASE_URL", "https://syncthing.lan:8384"),
            ("SYNCTHING_API_KEY_FILE", path.as_str()),
        ]))
        .await
        .unwrap();

        assert_eq!(config.syncthing.unwrap().api_key, "file-key");
    }

    #[tokio::test]
    async fn test_empty_api_key_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();

        let result = Config::from_map(&vars(&[
            ("SYNCTHING_BASE_URL", "https://syncthing.lan:8384"),
            ("SYNCTHING_API_KEY_FILE", path.as_str()),
        ]))
        .await;

        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[tokio::test]
    async fn test_relative_base_url_is_rejected() {
        let result = Config::from_map(&vars(&[
            ("SYNCTHING_BASE_URL", "localhost"),
            ("SYNCTHING_API_KEY", "key"),
        ]))
        .await;

        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[tokio::test]
    async fn test_numeric_poll_interval_is_seconds() {
        let config = Config::from_map(&vars(&[("SYNCTHING_DASHBOARD_POLL_INTERVAL", "2")]))
            .await
            .unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_zero_poll_interval_is_rejected() {
        let result = Config::from_map(&vars(&[("SYNCTHING_DASHBOARD_POLL_INTERVAL", "0s")])).await;
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[tokio::test]
    async fn test_invalid_values_fall_back_to_defaults() {
        let config = Config::from_map(&vars(&[
            ("SYNCTHING_DASHBOARD_POLL_INTERVAL", "soon"),
            ("SYNCTHING_DASHBOARD_READ_TIMEOUT", "10 parsecs"),
        ]))
        .await
        .unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_parse_duration_formats() {
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("1m30s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("1.5h"), Some(Duration::from_secs(5400)));
        assert_eq!(parse_duration("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("5 s"), None);
        assert_eq!(parse_duration("ms"), None);
    }

    #[test]
    fn test_bind_address_expands_bare_port() {
        let config = Config::default();
        assert_eq!(config.bind_address().unwrap().to_string(), "0.0.0.0:8080");
    }
}
