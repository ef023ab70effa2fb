use std::path::PathBuf;

use directories::ProjectDirs;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::cli::SyncArgs;
use crate::error::{Result, SyncError};

/// Optional on-disk configuration, `~/.config/jira-sync/config.toml`.
#[derive(Deserialize, Default)]
pub struct ConfigFile {
    pub server_url: Option<String>,
    pub api_token: Option<String>,
    pub default_project: Option<String>,
}

impl ConfigFile {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(ConfigFile::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| SyncError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| SyncError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "jira-sync")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(SyncError::NoConfigDir)
    }
}

/// Environment overrides, captured once at startup so resolution itself is a
/// pure function of its inputs.
#[derive(Default)]
pub struct EnvOverrides {
    pub server_url: Option<String>,
    pub api_token: Option<String>,
    pub project: Option<String>,
}

impl EnvOverrides {
    pub fn capture() -> Self {
        Self {
            server_url: std::env::var("JIRA_SERVER_URL").ok(),
            api_token: std::env::var("JIRA_API_TOKEN").ok(),
            project: std::env::var("JIRA_PROJECT_KEY").ok(),
        }
    }
}

/// Fully resolved configuration for one sync run, threaded explicitly into
/// the fetcher and the store.
#[derive(Debug)]
pub struct SyncConfig {
    pub server_url: Url,
    pub api_token: String,
    pub project: String,
    pub limit: Option<u32>,
    pub db_path: PathBuf,
}

impl SyncConfig {
    /// Merge config file, environment, and CLI flags.
    /// Precedence: flag over env over file.
    pub fn resolve(file: &ConfigFile, env: &EnvOverrides, args: &SyncArgs) -> Result<Self> {
        let server_url =
            first_nonempty(&[env.server_url.as_deref(), file.server_url.as_deref()])
                .ok_or(SyncError::MissingServerUrl)?;
        let server_url = parse_server_url(server_url)?;

        let api_token = first_nonempty(&[env.api_token.as_deref(), file.api_token.as_deref()])
            .ok_or(SyncError::MissingApiToken)?
            .to_string();

        let project = first_nonempty(&[
            args.project.as_deref(),
            env.project.as_deref(),
            file.default_project.as_deref(),
        ])
        .ok_or(SyncError::MissingProject)?;
        let project = validate_project_key(project)?;

        Ok(Self {
            server_url,
            api_token,
            project,
            limit: args.limit,
            db_path: args.db_path.clone(),
        })
    }
}

fn first_nonempty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
}

fn parse_server_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|_| SyncError::InvalidServerUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(SyncError::InvalidServerUrl(raw.to_string())),
    }
}

/// Project keys are short uppercase codes like `PROJ`. Lowercase input is
/// accepted and upper-cased; anything else is rejected before it can end up
/// inside a JQL string.
fn validate_project_key(key: &str) -> Result<String> {
    let re = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
    if re.is_match(key) {
        Ok(key.to_uppercase())
    } else {
        Err(SyncError::InvalidProjectKey(key.to_string()))
    }
}
