use thiserror::Error;

/// Errors raised while talking to Syncthing or preparing the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Syncthing API error: {0}")]
    Syncthing(String),

    #[error("decode response {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("path {0:?} is not allowed in read-only mode")]
    PathNotAllowed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("either SYNCTHING_API_KEY or SYNCTHING_API_KEY_FILE must be set")]
    MissingApiKey,
}
