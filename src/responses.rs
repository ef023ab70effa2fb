//! Wire types for the Jira REST search endpoint.
//!
//! Every field below is optional: payloads deserialize without failing and an
//! explicit validation step ([`RawIssue::into_record`]) decides per record
//! whether the mandatory fields are actually present.

use serde::Deserialize;

use crate::types::IssueRecord;

/// One page of search results.
#[derive(Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "startAt")]
    pub start_at: u64,
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

#[derive(Deserialize)]
pub struct RawIssue {
    pub key: Option<String>,
    pub fields: Option<RawFields>,
}

#[derive(Deserialize)]
pub struct RawFields {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<NamedField>,
    pub assignee: Option<UserField>,
    pub creator: Option<UserField>,
    pub created: Option<String>,
    #[serde(rename = "fixVersions", default)]
    pub fix_versions: Vec<NamedField>,
}

/// Anything the API returns as an object with a `name` (statuses, versions).
#[derive(Deserialize)]
pub struct NamedField {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct UserField {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// A mandatory field the remote payload failed to provide. The record it
/// belongs to is skipped with a warning, never stored half-empty.
#[derive(Debug)]
pub struct MissingField {
    pub key: String,
    pub field: &'static str,
}

impl RawIssue {
    /// Validate the payload and map it to a record.
    ///
    /// Mandatory: `key`, `summary`, `status.name`, `creator.displayName`,
    /// `created`. Optional fields map to `None` when absent. Of multiple fix
    /// versions only the first is kept.
    pub fn into_record(self) -> std::result::Result<IssueRecord, MissingField> {
        let missing = |key: &str, field: &'static str| MissingField {
            key: key.to_string(),
            field,
        };

        let key = match self.key {
            Some(k) if !k.is_empty() => k,
            _ => return Err(missing("<unknown>", "key")),
        };

        let fields = self.fields.ok_or_else(|| missing(&key, "fields"))?;

        let title = fields.summary.ok_or_else(|| missing(&key, "summary"))?;
        let status = fields
            .status
            .and_then(|s| s.name)
            .ok_or_else(|| missing(&key, "status"))?;
        let creator = fields
            .creator
            .and_then(|u| u.display_name)
            .ok_or_else(|| missing(&key, "creator"))?;
        let creation_time = fields.created.ok_or_else(|| missing(&key, "created"))?;

        Ok(IssueRecord {
            key,
            title,
            description: fields.description,
            status,
            assignee: fields.assignee.and_then(|u| u.display_name),
            creator,
            creation_time,
            fix_version: fields.fix_versions.into_iter().find_map(|v| v.name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawIssue {
        serde_json::from_value(json).unwrap()
    }

    fn full_issue() -> serde_json::Value {
        serde_json::json!({
            "key": "ABC-1",
            "fields": {
                "summary": "Login broken",
                "description": "Steps to reproduce...",
                "status": { "name": "In Progress" },
                "assignee": { "displayName": "Dana Developer" },
                "creator": { "displayName": "Rory Reporter" },
                "created": "2024-03-01T10:00:00.000+0000",
                "fixVersions": [{ "name": "1.2.0" }, { "name": "1.3.0" }]
            }
        })
    }

    #[test]
    fn test_full_payload_maps_all_fields() {
        let record = raw(full_issue()).into_record().unwrap();
        assert_eq!(record.key, "ABC-1");
        assert_eq!(record.title, "Login broken");
        assert_eq!(record.description.as_deref(), Some("Steps to reproduce..."));
        assert_eq!(record.status, "In Progress");
        assert_eq!(record.assignee.as_deref(), Some("Dana Developer"));
        assert_eq!(record.creator, "Rory Reporter");
        assert_eq!(record.creation_time, "2024-03-01T10:00:00.000+0000");
    }

    #[test]
    fn test_first_of_multiple_fix_versions_wins() {
        let record = raw(full_issue()).into_record().unwrap();
        assert_eq!(record.fix_version.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_missing_summary_is_reported_not_mapped() {
        let mut json = full_issue();
        json["fields"].as_object_mut().unwrap().remove("summary");
        let err = raw(json).into_record().unwrap_err();
        assert_eq!(err.key, "ABC-1");
        assert_eq!(err.field, "summary");
    }

    #[test]
    fn test_missing_key_is_reported() {
        let mut json = full_issue();
        json.as_object_mut().unwrap().remove("key");
        let err = raw(json).into_record().unwrap_err();
        assert_eq!(err.field, "key");
    }

    #[test]
    fn test_null_status_name_counts_as_missing() {
        let mut json = full_issue();
        json["fields"]["status"] = serde_json::json!({ "name": null });
        let err = raw(json).into_record().unwrap_err();
        assert_eq!(err.field, "status");
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let json = serde_json::json!({
            "key": "ABC-2",
            "fields": {
                "summary": "No frills",
                "status": { "name": "To Do" },
                "creator": { "displayName": "Rory Reporter" },
                "created": "2024-03-02T09:00:00.000+0000"
            }
        });
        let record = raw(json).into_record().unwrap();
        assert_eq!(record.description, None);
        assert_eq!(record.assignee, None);
        assert_eq!(record.fix_version, None);
    }

    #[test]
    fn test_null_description_maps_to_none() {
        let mut json = full_issue();
        json["fields"]["description"] = serde_json::Value::Null;
        let record = raw(json).into_record().unwrap();
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_search_response_page_shape() {
        let page: SearchResponse = serde_json::from_value(serde_json::json!({
            "startAt": 0,
            "maxResults": 50,
            "total": 1,
            "issues": [full_issue()]
        }))
        .unwrap();
        assert_eq!(page.start_at, 0);
        assert_eq!(page.total, 1);
        assert_eq!(page.issues.len(), 1);
    }
}
