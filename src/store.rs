//! SQLite-backed snapshot store for fetched issues.

use std::path::Path;

use rusqlite::{params, Connection, Row};

use crate::error::{Result, SyncError};
use crate::types::IssueRecord;

/// Schema for the snapshot table: eight columns, `key` as primary key.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS jira_issues (
    key TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL,
    assignee TEXT,
    creator TEXT NOT NULL,
    creation_time TEXT NOT NULL,
    fix_version TEXT
);
";

const UPSERT: &str = "INSERT INTO jira_issues
 (key, title, description, status, assignee, creator, creation_time, fix_version)
 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
 ON CONFLICT(key) DO UPDATE SET
    title = excluded.title,
    description = excluded.description,
    status = excluded.status,
    assignee = excluded.assignee,
    creator = excluded.creator,
    creation_time = excluded.creation_time,
    fix_version = excluded.fix_version";

const SELECT_COLUMNS: &str =
    "key, title, description, status, assignee, creator, creation_time, fix_version";

#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database file, creating it if absent, and ensure the schema.
    ///
    /// Missing parent directories are not created; an unwritable location is
    /// a storage failure for the caller to surface.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| SyncError::DbOpen {
            path: path.to_path_buf(),
            source: e,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(Store { conn })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }

    /// Upsert one batch of records inside a single transaction: insert when
    /// the key is new, otherwise overwrite all non-key columns. Returns the
    /// number of rows written.
    pub fn upsert_batch(&mut self, records: &[IssueRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT)?;
            for record in records {
                stmt.execute(params![
                    record.key,
                    record.title,
                    record.description,
                    record.status,
                    record.assignee,
                    record.creator,
                    record.creation_time,
                    record.fix_version,
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    pub fn count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jira_issues", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Stored issues, newest creation time first, optionally filtered by
    /// exact status name (case-insensitive).
    pub fn list(&self, status: Option<&str>, limit: u32) -> Result<Vec<IssueRecord>> {
        let mut stmt;
        let rows = match status {
            Some(status) => {
                stmt = self.conn.prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM jira_issues
                     WHERE status = ?1 COLLATE NOCASE
                     ORDER BY creation_time DESC LIMIT ?2"
                ))?;
                stmt.query_map(params![status, limit], row_to_record)?
            }
            None => {
                stmt = self.conn.prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM jira_issues
                     ORDER BY creation_time DESC LIMIT ?1"
                ))?;
                stmt.query_map(params![limit], row_to_record)?
            }
        };

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

fn row_to_record(row: &Row) -> rusqlite::Result<IssueRecord> {
    Ok(IssueRecord {
        key: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        assignee: row.get(4)?,
        creator: row.get(5)?,
        creation_time: row.get(6)?,
        fix_version: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, status: &str, created: &str) -> IssueRecord {
        IssueRecord {
            key: key.to_string(),
            title: format!("Title for {key}"),
            description: Some("details".to_string()),
            status: status.to_string(),
            assignee: None,
            creator: "Rory Reporter".to_string(),
            creation_time: created.to_string(),
            fix_version: None,
        }
    }

    #[test]
    fn test_upsert_inserts_new_rows() {
        let mut store = Store::open_in_memory().unwrap();
        let written = store
            .upsert_batch(&[
                record("ABC-1", "To Do", "2024-03-01T10:00:00.000+0000"),
                record("ABC-2", "To Do", "2024-03-02T10:00:00.000+0000"),
            ])
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_upsert_same_key_overwrites_non_key_fields() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .upsert_batch(&[record("ABC-1", "To Do", "2024-03-01T10:00:00.000+0000")])
            .unwrap();
        store
            .upsert_batch(&[record("ABC-1", "Done", "2024-03-01T10:00:00.000+0000")])
            .unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let rows = store.list(None, 10).unwrap();
        assert_eq!(rows[0].status, "Done");
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let batch = vec![
            record("ABC-1", "To Do", "2024-03-01T10:00:00.000+0000"),
            record("ABC-2", "Done", "2024-03-02T10:00:00.000+0000"),
        ];
        let mut store = Store::open_in_memory().unwrap();
        store.upsert_batch(&batch).unwrap();
        let first = store.list(None, 10).unwrap();
        store.upsert_batch(&batch).unwrap();
        let second = store.list(None, 10).unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_nullable_fields_round_trip_as_null() {
        let mut store = Store::open_in_memory().unwrap();
        let mut rec = record("ABC-1", "To Do", "2024-03-01T10:00:00.000+0000");
        rec.description = None;
        rec.fix_version = None;
        store.upsert_batch(&[rec]).unwrap();

        let rows = store.list(None, 10).unwrap();
        assert_eq!(rows[0].description, None);
        assert_eq!(rows[0].fix_version, None);
    }

    #[test]
    fn test_list_orders_newest_first_and_honors_limit() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .upsert_batch(&[
                record("ABC-1", "To Do", "2024-03-01T10:00:00.000+0000"),
                record("ABC-3", "To Do", "2024-03-03T10:00:00.000+0000"),
                record("ABC-2", "To Do", "2024-03-02T10:00:00.000+0000"),
            ])
            .unwrap();

        let rows = store.list(None, 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "ABC-3");
        assert_eq!(rows[1].key, "ABC-2");
    }

    #[test]
    fn test_list_filters_by_status_case_insensitive() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .upsert_batch(&[
                record("ABC-1", "Done", "2024-03-01T10:00:00.000+0000"),
                record("ABC-2", "In Progress", "2024-03-02T10:00:00.000+0000"),
            ])
            .unwrap();

        let rows = store.list(Some("done"), 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "ABC-1");
    }

    #[test]
    fn test_open_creates_file_and_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issues.db");

        let mut store = Store::open(&path).unwrap();
        store
            .upsert_batch(&[record("ABC-1", "To Do", "2024-03-01T10:00:00.000+0000")])
            .unwrap();
        drop(store);

        let store = Store::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_open_fails_for_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir").join("x.db");
        let err = Store::open(&path).unwrap_err();
        assert!(matches!(err, SyncError::DbOpen { .. }));
        assert_eq!(err.exit_code(), 5);
    }
}
