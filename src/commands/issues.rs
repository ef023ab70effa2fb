use tabled::Tabled;

use crate::cli::IssueListArgs;
use crate::error::Result;
use crate::output;
use crate::store::Store;
use crate::types::IssueRecord;

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&IssueRecord> for IssueRow {
    fn from(issue: &IssueRecord) -> Self {
        Self {
            key: issue.key.clone(),
            title: output::truncate(&issue.title, 50),
            status: output::status_colored(&issue.status),
            assignee: issue.assignee.clone().unwrap_or_default(),
            created: output::format_date_only(&issue.creation_time),
        }
    }
}

/// List issues from the local database. Purely local; never talks to the API.
pub fn list(args: &IssueListArgs) -> Result<()> {
    let store = Store::open(&args.db_path)?;
    let issues = store.list(args.status.as_deref(), args.limit)?;

    if issues.is_empty() && !output::is_json_output() {
        output::print_message("No issues stored yet. Run a sync first.");
        return Ok(());
    }

    output::print_table(&issues, |issue| IssueRow::from(issue));
    Ok(())
}
