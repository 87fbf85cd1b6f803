//! Core types for stale-mrs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// A GitLab group
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Group {
    /// Group ID
    pub id: u64,
    /// Display name, matched against exclusion keywords
    pub name: String,
}

/// Author of a merge request
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Author {
    /// GitLab user ID
    pub id: u64,
    /// GitLab username
    pub username: String,
}

/// Assignee of a merge request
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Assignee {
    /// GitLab user ID
    pub id: u64,
    /// GitLab username
    pub username: String,
    /// Full name
    #[serde(default)]
    pub name: String,
    /// Account state ("active", "blocked", ...)
    #[serde(default)]
    pub state: Option<String>,
}

/// Reference strings GitLab attaches to a merge request
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct References {
    /// Fully qualified reference, e.g. `group/project!12`
    #[serde(default)]
    pub full: String,
}

/// Why a merge request can or cannot currently be merged
///
/// Codes GitLab adds later deserialize as [`DetailedMergeStatus::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailedMergeStatus {
    /// Blocked by another merge request
    BlockedStatus,
    /// Potential conflict with the target branch
    BrokenStatus,
    /// Mergeability check in progress
    Checking,
    /// Mergeability not yet checked
    Unchecked,
    /// Pipeline must succeed first
    CiMustPass,
    /// Pipeline still running
    CiStillRunning,
    /// Open discussions
    DiscussionsNotResolved,
    /// Draft merge request
    DraftStatus,
    /// External status checks pending
    ExternalStatusChecks,
    /// Ready to merge
    Mergeable,
    /// Approval missing
    NotApproved,
    /// Merge request not open
    NotOpen,
    /// Denied policies
    PoliciesDenied,
    /// Any code not listed above
    #[serde(other)]
    Other,
}

impl DetailedMergeStatus {
    /// Human readable status line; empty for unknown codes
    pub const fn description(self) -> &'static str {
        match self {
            Self::BlockedStatus => "Blocked by another merge request.",
            Self::BrokenStatus => {
                "Can't merge into the target branch due to a potential conflict."
            }
            Self::Checking => "Git is testing if a valid merge is possible.",
            Self::Unchecked => "Git has not yet tested if a valid merge is possible.",
            Self::CiMustPass => "A CI/CD pipeline must succeed before merge.",
            Self::CiStillRunning => "A CI/CD pipeline is still running.",
            Self::DiscussionsNotResolved => "All discussions must be resolved before merge.",
            Self::DraftStatus => "Can't merge because the merge request is a draft.",
            Self::ExternalStatusChecks => "All status checks must pass before merge.",
            Self::Mergeable => "The branch can merge cleanly into the target branch.",
            Self::NotApproved => "Approval is required before merge.",
            Self::NotOpen => "The merge request must be open before merge.",
            Self::PoliciesDenied => "The merge request contains denied policies.",
            Self::Other => "",
        }
    }
}

/// An open merge request from the group merge requests endpoint
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MergeRequest {
    /// Instance-wide ID
    pub id: u64,
    /// Project-scoped ID
    pub iid: u64,
    /// Owning project
    pub project_id: u64,
    /// MR title
    pub title: String,
    /// Web URL for the MR
    pub web_url: String,
    /// Who opened it
    pub author: Author,
    /// Current assignee, if any
    #[serde(default)]
    pub assignee: Option<Assignee>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Detailed merge status; `None` when GitLab omits it
    #[serde(default)]
    pub detailed_merge_status: Option<DetailedMergeStatus>,
    /// Reference strings
    #[serde(default)]
    pub references: References,
}

impl MergeRequest {
    /// Key used to group this MR by assignee
    pub fn assignee_key(&self) -> AssigneeKey {
        self.assignee
            .as_ref()
            .map_or(AssigneeKey::Unassigned, |a| AssigneeKey::User(a.id))
    }

    /// Status line text for this MR
    pub fn status_text(&self) -> &'static str {
        self.detailed_merge_status
            .map_or("", DetailedMergeStatus::description)
    }

    /// Full reference for log lines, falling back to `!iid`
    pub fn reference(&self) -> String {
        if self.references.full.is_empty() {
            format!("!{}", self.iid)
        } else {
            self.references.full.clone()
        }
    }
}

/// Grouping key for merge requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssigneeKey {
    /// Assigned to this GitLab user ID
    User(u64),
    /// No assignee
    Unassigned,
}

impl fmt::Display for AssigneeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "{id}"),
            Self::Unassigned => write!(f, "Unassigned"),
        }
    }
}

/// Per-assignee line of the channel summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeSummary {
    /// Grouping key
    pub key: AssigneeKey,
    /// Number of distinct MR IDs
    pub count: usize,
    /// GitLab username ("Unassigned" for the sentinel)
    pub username: String,
    /// Email resolved from GitLab, if visible
    pub email: Option<String>,
    /// Account state ("blocked" gets flagged)
    pub state: Option<String>,
}

impl AssigneeSummary {
    /// Whether the assignee's account is blocked
    pub fn is_blocked(&self) -> bool {
        self.state.as_deref() == Some("blocked")
    }
}

/// Destination of an individual notification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recipient {
    /// The configured fallback channel
    Fallback,
    /// A Slack user ID, messaged directly
    User(String),
}

impl Recipient {
    /// Channel ID to post to
    pub fn channel<'a>(&'a self, fallback_channel: &'a str) -> &'a str {
        match self {
            Self::Fallback => fallback_channel,
            Self::User(id) => id,
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fallback => write!(f, "fallback channel"),
            Self::User(id) => write!(f, "user {id}"),
        }
    }
}
