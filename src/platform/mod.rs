//! Platform services for GitLab and Slack
//!
//! Collectors and the notifier only see these traits, so a run can be
//! driven against in-memory fakes.

mod dry_run;
mod gitlab;
mod pagination;
mod slack;

pub use dry_run::DryRunChat;
pub use gitlab::{GitLabService, PAGE_SIZE};
pub use pagination::{Page, PageCursor};
pub use slack::{SLACK_API_URL, SlackService};

use crate::error::{Error, Result};
use crate::types::{Group, MergeRequest};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP client shared by the platform services
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Internal(format!("failed to create HTTP client: {e}")))
}

/// Read and write access to the source hosting platform
#[async_trait]
pub trait HostingService: Send + Sync {
    /// Fetch one page of groups visible to the token
    async fn list_groups(&self, page: u32) -> Result<Page<Group>>;

    /// Fetch one page of open merge requests in non-archived projects of a
    /// group, last updated before `updated_before`
    async fn list_stale_merge_requests(
        &self,
        group_id: u64,
        updated_before: &str,
        page: u32,
    ) -> Result<Page<MergeRequest>>;

    /// Set the assignee of a merge request
    async fn assign_merge_request(&self, project_id: u64, iid: u64, user_id: u64) -> Result<()>;

    /// Look up a user's email; `None` when the token cannot see it
    async fn get_user_email(&self, user_id: u64) -> Result<Option<String>>;
}

/// Messaging platform used for notifications
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Post a message (link previews suppressed) to a channel or user ID
    async fn post_message(&self, channel: &str, text: &str) -> Result<()>;

    /// Resolve a user ID by email
    ///
    /// Unknown emails yield an error for which
    /// [`Error::is_not_found`](crate::error::Error::is_not_found) holds.
    async fn lookup_user_by_email(&self, email: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_services_build_from_shared_client() {
        assert!(http_client(Duration::from_secs(5)).is_ok());
        assert!(
            GitLabService::new("https://gitlab.example.com", String::new(), Duration::from_secs(5))
                .is_ok()
        );
        assert!(SlackService::new(String::new(), Duration::from_secs(5)).is_ok());
    }
}
