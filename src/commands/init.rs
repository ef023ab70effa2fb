use std::io::{self, Write};

use crate::config::ConfigFile;
use crate::error::{Result, SyncError};

pub fn run() -> Result<()> {
    let config_path = ConfigFile::config_path()?;

    if config_path.exists() {
        print!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("jira-sync configuration");
    println!("=======================\n");

    print!("Enter your Jira server URL (e.g. https://company.atlassian.net): ");
    io::stdout().flush()?;
    let mut server_url = String::new();
    io::stdin().read_line(&mut server_url)?;
    let server_url = server_url.trim();

    if server_url.is_empty() {
        return Err(SyncError::MissingServerUrl);
    }

    print!("Enter your Jira API token: ");
    io::stdout().flush()?;
    let mut api_token = String::new();
    io::stdin().read_line(&mut api_token)?;
    let api_token = api_token.trim();

    if api_token.is_empty() {
        return Err(SyncError::MissingApiToken);
    }

    print!("Enter default project key (e.g. PROJ) [optional]: ");
    io::stdout().flush()?;
    let mut default_project = String::new();
    io::stdin().read_line(&mut default_project)?;
    let default_project = default_project.trim();

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SyncError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    let mut config_content = format!("server_url = \"{server_url}\"\n");
    config_content.push_str(&format!("api_token = \"{api_token}\"\n"));
    if !default_project.is_empty() {
        config_content.push_str(&format!("default_project = \"{default_project}\"\n"));
    }

    std::fs::write(&config_path, config_content).map_err(|e| SyncError::ConfigRead {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("Set JIRA_API_TOKEN in the environment to override the stored token.");

    Ok(())
}
