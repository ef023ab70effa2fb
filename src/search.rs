use tracing::{debug, warn};

use crate::client::JiraClient;
use crate::error::Result;
use crate::types::IssueRecord;

pub const PAGE_SIZE: u32 = 50;

/// JQL for one project's issues, newest created first.
pub fn project_jql(project: &str) -> String {
    format!("project = {project} ORDER BY created DESC")
}

/// How many records to request next, given what the limit still allows.
fn page_request_size(remaining: Option<u64>) -> u32 {
    match remaining {
        Some(r) => PAGE_SIZE.min(r.min(u64::from(u32::MAX)) as u32),
        None => PAGE_SIZE,
    }
}

/// Lazy, finite, page-by-page walk over a project's issues.
///
/// Nothing is fetched before the first [`next_page`](SearchPager::next_page)
/// call, and `Ok(None)` marks exhaustion: source drained or limit satisfied.
/// The walk is not restartable mid-sequence; re-running the whole pass is
/// safe because storage is idempotent.
///
/// Records failing field validation are skipped with a warning and do not
/// count toward the limit.
pub struct SearchPager<'a> {
    client: &'a JiraClient,
    jql: String,
    limit: Option<u64>,
    start_at: u64,
    yielded: u64,
    skipped: u64,
    done: bool,
}

impl<'a> SearchPager<'a> {
    pub fn new(client: &'a JiraClient, project: &str, limit: Option<u32>) -> Self {
        Self {
            client,
            jql: project_jql(project),
            limit: limit.map(u64::from),
            start_at: 0,
            yielded: 0,
            skipped: 0,
            done: false,
        }
    }

    /// Records dropped so far for missing mandatory fields.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn remaining(&self) -> Option<u64> {
        self.limit.map(|l| l.saturating_sub(self.yielded))
    }

    /// Fetch and validate the next page.
    pub async fn next_page(&mut self) -> Result<Option<Vec<IssueRecord>>> {
        if self.done || self.remaining() == Some(0) {
            self.done = true;
            return Ok(None);
        }

        let request_size = page_request_size(self.remaining());
        let page = self
            .client
            .search_page(&self.jql, self.start_at, request_size)
            .await?;

        let received = page.issues.len() as u64;
        debug!(
            start_at = page.start_at,
            total = page.total,
            received,
            "fetched search page"
        );
        self.start_at += received;
        if received < u64::from(request_size) || self.start_at >= page.total {
            self.done = true;
        }

        let mut records = Vec::with_capacity(page.issues.len());
        for raw in page.issues {
            match raw.into_record() {
                Ok(record) => records.push(record),
                Err(miss) => {
                    self.skipped += 1;
                    warn!(
                        key = %miss.key,
                        field = miss.field,
                        "skipping issue with missing mandatory field"
                    );
                }
            }
        }

        if let Some(remaining) = self.remaining() {
            if records.len() as u64 >= remaining {
                records.truncate(remaining as usize);
                self.done = true;
            }
        }
        self.yielded += records.len() as u64;

        Ok(Some(records))
    }
}
