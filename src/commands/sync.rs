use tracing::info;

use crate::client::JiraClient;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::output;
use crate::search::SearchPager;
use crate::store::Store;

/// Run the sync pipeline: fetch the project's issues page by page and upsert
/// each page into the store inside its own transaction. An abort mid-run
/// leaves the store at the last committed page boundary.
pub async fn run(config: &SyncConfig) -> Result<()> {
    let client = JiraClient::new(config.server_url.clone(), config.api_token.clone());
    let mut store = Store::open(&config.db_path)?;
    let mut pager = SearchPager::new(&client, &config.project, config.limit);

    info!(
        server = client.server(),
        project = %config.project,
        "starting sync"
    );

    let mut written = 0;
    while let Some(batch) = pager.next_page().await? {
        written += store.upsert_batch(&batch)?;
        info!(written, "committed page");
    }

    let skipped = pager.skipped();
    let total = store.count()?;
    output::print_message(&format!(
        "Synced {written} issue{} from {} into {} ({skipped} skipped, {total} stored in total)",
        if written == 1 { "" } else { "s" },
        config.project,
        config.db_path.display(),
    ));

    Ok(())
}
