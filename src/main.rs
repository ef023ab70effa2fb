mod cli;
mod client;
mod commands;
mod config;
mod error;
mod output;
mod responses;
mod search;
mod store;
mod types;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::{ConfigFile, EnvOverrides, SyncConfig};
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = std::error::Error::source(cause);
            }
        }

        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "jira_sync=debug"
    } else {
        "jira_sync=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    output::set_json_output(cli.json);

    match cli.command {
        // Commands that don't need config or network
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "jira-sync", &mut io::stdout());
        }
        Some(Commands::Init) => {
            commands::init::run()?;
        }
        Some(Commands::Issues(args)) => {
            commands::issues::list(&args)?;
        }
        // No subcommand: run the sync pipeline
        None => {
            let file = ConfigFile::load()?;
            let env = EnvOverrides::capture();
            let config = SyncConfig::resolve(&file, &env, &cli.sync)?;
            commands::sync::run(&config).await?;
        }
    }

    Ok(())
}
