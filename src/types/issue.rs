use serde::{Deserialize, Serialize};

/// One issue as persisted locally: a read-only snapshot of the fields we
/// keep from the remote tracker. `key` is the primary key in storage.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub assignee: Option<String>,
    pub creator: String,
    pub creation_time: String,
    pub fix_version: Option<String>,
}
