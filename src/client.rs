use const_format::concatcp;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{Result, SyncError};
use crate::responses::SearchResponse;

const SEARCH_PATH: &str = "/rest/api/2/search";

const USER_AGENT: &str = concatcp!("jira-sync/", env!("CARGO_PKG_VERSION"));

/// Field projection for the search endpoint: exactly what the store keeps.
const SEARCH_FIELDS: &str = "summary,description,status,assignee,creator,created,fixVersions";

pub struct JiraClient {
    http: Client,
    base: Url,
    api_token: String,
}

impl JiraClient {
    pub fn new(base: Url, api_token: String) -> Self {
        Self {
            http: Client::new(),
            base,
            api_token,
        }
    }

    pub fn server(&self) -> &str {
        self.base.as_str()
    }

    fn search_url(&self) -> Result<Url> {
        self.base
            .join(SEARCH_PATH)
            .map_err(|_| SyncError::InvalidServerUrl(self.base.to_string()))
    }

    /// Fetch one page of search results.
    ///
    /// 401/403 means the token was rejected; any other non-2xx status is an
    /// API error carrying the response body. No retry beyond what reqwest
    /// itself does.
    pub async fn search_page(
        &self,
        jql: &str,
        start_at: u64,
        max_results: u32,
    ) -> Result<SearchResponse> {
        let start_at = start_at.to_string();
        let max_results = max_results.to_string();

        let response = self
            .http
            .get(self.search_url()?)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("jql", jql),
                ("startAt", start_at.as_str()),
                ("maxResults", max_results.as_str()),
                ("fields", SEARCH_FIELDS),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SyncError::AuthRejected {
                server: self.base.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(SyncError::ApiError {
                status: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        Ok(response.json().await?)
    }
}
