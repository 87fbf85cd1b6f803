//! Job configuration
//!
//! Built once at startup and passed by reference to every stage.

use crate::error::{Error, Result};
use crate::types::AssigneeKey;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

/// Default timeout for every API request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Grace period added to the `updated_before` cutoff
const CUTOFF_GRACE_MINUTES: i64 = 5;

/// Configuration for one run of the job
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// GitLab base URL without trailing slash, e.g. `https://gitlab.example.com`
    pub gitlab_url: String,
    /// MRs not updated for this many days are stale
    pub stale_days: u32,
    /// Slack channel receiving the summary and unroutable MRs
    pub fallback_channel: String,
    /// Email domains reachable by direct message
    pub internal_domains: Vec<String>,
    /// Groups whose name contains any of these are skipped
    pub exclude_groups: Vec<String>,
    /// Timeout applied to every request
    pub request_timeout: Duration,
    /// Log writes instead of performing them
    pub dry_run: bool,
}

impl JobConfig {
    /// Create a configuration with default timeout and no dry run
    pub fn new(
        gitlab_url: &str,
        stale_days: u32,
        fallback_channel: impl Into<String>,
    ) -> Result<Self> {
        let gitlab_url = gitlab_url.trim().trim_end_matches('/').to_string();
        if gitlab_url.is_empty() {
            return Err(Error::Config("GitLab base URL must not be empty".to_string()));
        }
        let fallback_channel = fallback_channel.into();
        if fallback_channel.trim().is_empty() {
            return Err(Error::Config("fallback channel must not be empty".to_string()));
        }

        Ok(Self {
            gitlab_url,
            stale_days,
            fallback_channel,
            internal_domains: Vec::new(),
            exclude_groups: Vec::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            dry_run: false,
        })
    }

    /// Set the internal email domains
    #[must_use]
    pub fn with_internal_domains(mut self, domains: Vec<String>) -> Self {
        self.internal_domains = domains;
        self
    }

    /// Set the group exclusion keywords
    #[must_use]
    pub fn with_exclude_groups(mut self, keywords: Vec<String>) -> Self {
        self.exclude_groups = keywords;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable dry run
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Cutoff passed to GitLab as `updated_before`
    pub fn updated_before(&self, now: DateTime<Utc>) -> String {
        let cutoff = now - ChronoDuration::days(i64::from(self.stale_days))
            + ChronoDuration::minutes(CUTOFF_GRACE_MINUTES);
        cutoff.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Whether the email's domain is on the internal allow-list
    pub fn is_internal_email(&self, email: &str) -> bool {
        let Some((_, domain)) = email.rsplit_once('@') else {
            return false;
        };
        self.internal_domains
            .iter()
            .any(|d| d.eq_ignore_ascii_case(domain))
    }

    /// Dashboard link listing the open MRs of one assignee
    pub fn assignee_dashboard_url(&self, key: AssigneeKey, username: &str) -> String {
        let filter = match key {
            AssigneeKey::User(_) => {
                format!("assignee_username={}", urlencoding::encode(username))
            }
            AssigneeKey::Unassigned => "assignee_id=None".to_string(),
        };
        format!(
            "{}/dashboard/merge_requests?scope=all&state=opened&{filter}",
            self.gitlab_url
        )
    }
}
