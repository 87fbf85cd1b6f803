//! GitLab platform service implementation

use crate::error::{Error, Result};
use crate::platform::{HostingService, Page, http_client};
use crate::types::{Group, MergeRequest};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Page size requested from every list endpoint (GitLab's maximum)
pub const PAGE_SIZE: u32 = 100;

/// Header carrying the next page number
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    base_url: String,
}

#[derive(Deserialize)]
struct User {
    #[serde(default)]
    email: Option<String>,
}

impl GitLabService {
    /// Create a new GitLab service for `base_url` (e.g. `https://gitlab.example.com`)
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self> {
        let client = http_client(timeout)?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("PRIVATE-TOKEN", &self.token)
    }

    fn next_page(response: &Response) -> Option<u32> {
        response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>> {
        let response = self
            .authed(self.client.get(self.api_url(path)))
            .query(query)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;

        let next_page = Self::next_page(&response);
        let items: Vec<T> = response.json().await?;
        Ok(Page::new(items, next_page))
    }
}

#[async_trait]
impl HostingService for GitLabService {
    async fn list_groups(&self, page: u32) -> Result<Page<Group>> {
        debug!(page, "listing groups");
        let groups: Page<Group> = self
            .get_page(
                "/groups",
                &[
                    ("page", page.to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        debug!(
            page,
            count = groups.items.len(),
            next_page = ?groups.next_page,
            "listed groups"
        );
        Ok(groups)
    }

    async fn list_stale_merge_requests(
        &self,
        group_id: u64,
        updated_before: &str,
        page: u32,
    ) -> Result<Page<MergeRequest>> {
        debug!(group_id, updated_before, page, "listing stale MRs");
        let mrs: Page<MergeRequest> = self
            .get_page(
                &format!("/groups/{group_id}/merge_requests"),
                &[
                    ("non_archived", "true".to_string()),
                    ("state", "opened".to_string()),
                    ("scope", "all".to_string()),
                    ("updated_before", updated_before.to_string()),
                    ("page", page.to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        debug!(
            group_id,
            page,
            count = mrs.items.len(),
            next_page = ?mrs.next_page,
            "listed stale MRs"
        );
        Ok(mrs)
    }

    async fn assign_merge_request(&self, project_id: u64, iid: u64, user_id: u64) -> Result<()> {
        debug!(project_id, mr_iid = iid, user_id, "assigning MR");
        let url = self.api_url(&format!("/projects/{project_id}/merge_requests/{iid}"));

        self.authed(self.client.put(&url))
            .json(&serde_json::json!({ "assignee_id": user_id }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;

        debug!(project_id, mr_iid = iid, user_id, "assigned MR");
        Ok(())
    }

    async fn get_user_email(&self, user_id: u64) -> Result<Option<String>> {
        debug!(user_id, "getting user email");
        let url = self.api_url(&format!("/users/{user_id}"));

        let user: User = self
            .authed(self.client.get(&url))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        let email = user.email.filter(|e| !e.is_empty());
        debug!(user_id, found = email.is_some(), "got user email");
        Ok(email)
    }
}
