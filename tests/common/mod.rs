//! Shared test helpers

#![allow(dead_code)]

mod mock_platform;

#[allow(unused_imports)]
pub use mock_platform::{AssignCall, ListMrsCall, MockChat, MockHosting, PostCall};

use chrono::{DateTime, Duration, TimeZone, Utc};
use stale_mrs::config::JobConfig;
use stale_mrs::types::{Assignee, Author, DetailedMergeStatus, Group, MergeRequest, References};

pub const GITLAB_URL: &str = "https://gitlab.example.com";
pub const FALLBACK: &str = "C0FALLBACK";

/// Fixed "now" for deterministic ages
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
}

/// Config with `example.com` as the only internal domain
pub fn test_config() -> JobConfig {
    JobConfig::new(GITLAB_URL, 14, FALLBACK)
        .unwrap()
        .with_internal_domains(vec!["example.com".to_string()])
}

pub fn make_group(id: u64, name: &str) -> Group {
    Group {
        id,
        name: name.to_string(),
    }
}

pub fn make_assignee(id: u64, username: &str) -> Assignee {
    Assignee {
        id,
        username: username.to_string(),
        name: format!("{username} (full name)"),
        state: Some("active".to_string()),
    }
}

/// MR in `team/service`, authored by user 900, updated 20 days before `now()`
pub fn make_mr(id: u64, title: &str, assignee: Option<Assignee>) -> MergeRequest {
    MergeRequest {
        id,
        iid: id + 1000,
        project_id: 42,
        title: title.to_string(),
        web_url: format!("{GITLAB_URL}/team/service/-/merge_requests/{}", id + 1000),
        author: Author {
            id: 900,
            username: "author".to_string(),
        },
        assignee,
        updated_at: now() - Duration::days(20),
        detailed_merge_status: Some(DetailedMergeStatus::NotApproved),
        references: References {
            full: format!("team/service!{}", id + 1000),
        },
    }
}
