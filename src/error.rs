use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication rejected by {server} (status {status})")]
    AuthRejected { server: String, status: u16 },

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No server URL found. Set JIRA_SERVER_URL env var or add server_url to ~/.config/jira-sync/config.toml"
    )]
    MissingServerUrl,

    #[error(
        "No API token found. Set JIRA_API_TOKEN env var or add api_token to ~/.config/jira-sync/config.toml"
    )]
    MissingApiToken,

    #[error(
        "No project key given. Pass --project, set JIRA_PROJECT_KEY, or add default_project to the config file"
    )]
    MissingProject,

    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),

    #[error("Invalid project key: {0}")]
    InvalidProjectKey(String),

    #[error("Failed to open database at {path}: {source}")]
    DbOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl SyncError {
    /// Process exit status for this error. Each failure class gets its own
    /// code so scripts can tell a bad config from a dead network.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::ConfigRead { .. }
            | SyncError::ConfigParse { .. }
            | SyncError::NoConfigDir
            | SyncError::MissingServerUrl
            | SyncError::MissingApiToken
            | SyncError::MissingProject
            | SyncError::InvalidServerUrl(_)
            | SyncError::InvalidProjectKey(_) => 2,
            SyncError::AuthRejected { .. } => 3,
            SyncError::Http(_) | SyncError::ApiError { .. } => 4,
            SyncError::DbOpen { .. } | SyncError::Db(_) | SyncError::Io(_) => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
