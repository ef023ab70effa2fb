use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "jira-sync")]
#[command(about = "Sync issues from a Jira project into a local SQLite file", version)]
#[command(after_help = "EXAMPLES:
    jira-sync --project ABC              Sync every issue of project ABC
    jira-sync --limit 50                 Sync the 50 newest issues
    jira-sync --db-path ./abc.db         Write to a specific database file
    jira-sync issues --status Done       List synced issues from the local file
    jira-sync init                       Create the config file interactively")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub sync: SyncArgs,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Show error cause chains on failure
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List issues already stored in the local database
    #[command(after_help = "EXAMPLES:
    jira-sync issues
    jira-sync issues --status \"In Progress\" --limit 10
    jira-sync issues --db-path ./abc.db --json")]
    Issues(IssueListArgs),
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    jira-sync init")]
    Init,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    jira-sync completions bash > ~/.bash_completion.d/jira-sync
    jira-sync completions zsh > ~/.zfunc/_jira-sync
    jira-sync completions fish > ~/.config/fish/completions/jira-sync.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Clone)]
pub struct SyncArgs {
    /// Project key to sync (overrides JIRA_PROJECT_KEY)
    #[arg(long)]
    pub project: Option<String>,

    /// Maximum number of issues to fetch (everything when omitted)
    #[arg(long, short)]
    pub limit: Option<u32>,

    /// Database file to write
    #[arg(long, default_value = "jira_issues.db")]
    pub db_path: PathBuf,
}

#[derive(Args)]
pub struct IssueListArgs {
    /// Filter by status name
    #[arg(long)]
    pub status: Option<String>,

    /// Maximum number of issues to show
    #[arg(long, short, default_value = "25")]
    pub limit: u32,

    /// Database file to read
    #[arg(long, default_value = "jira_issues.db")]
    pub db_path: PathBuf,
}
