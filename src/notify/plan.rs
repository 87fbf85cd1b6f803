//! Notification planning - pure grouping and rendering
//!
//! No I/O happens here. Emails and Slack IDs are resolved by the delivery
//! code and passed in, which keeps message layout easy to unit test.

use crate::config::JobConfig;
use crate::types::{Assignee, AssigneeKey, AssigneeSummary, MergeRequest, Recipient};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Username shown for merge requests without an assignee
pub const UNASSIGNED: &str = "Unassigned";

/// Intro of the batch sent to the fallback channel
pub const FALLBACK_INTRO: &str = "The assignee(s) of the merge requests below either could not be found in Slack, or are external users.";

/// Merge requests of one assignee, before emails are resolved
#[derive(Debug, Clone)]
pub struct AssigneeGroup {
    /// Grouping key
    pub key: AssigneeKey,
    /// Assignee as seen on the first MR of the group
    pub assignee: Option<Assignee>,
    /// Distinct MR IDs
    pub merge_request_ids: HashSet<u64>,
}

impl AssigneeGroup {
    /// Summary for this group with the resolved email
    pub fn into_summary(self, email: Option<String>) -> AssigneeSummary {
        let (username, state) = self
            .assignee
            .map_or_else(|| (UNASSIGNED.to_string(), None), |a| (a.username, a.state));
        AssigneeSummary {
            key: self.key,
            count: self.merge_request_ids.len(),
            username,
            email,
            state,
        }
    }
}

/// Group MRs by assignee in order of first appearance
///
/// Duplicate MR IDs count once.
pub fn group_by_assignee(merge_requests: &[MergeRequest]) -> Vec<AssigneeGroup> {
    let mut index: HashMap<AssigneeKey, usize> = HashMap::new();
    let mut groups: Vec<AssigneeGroup> = Vec::new();

    for mr in merge_requests {
        let key = mr.assignee_key();
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(AssigneeGroup {
                key,
                assignee: mr.assignee.clone(),
                merge_request_ids: HashSet::new(),
            });
            groups.len() - 1
        });
        groups[slot].merge_request_ids.insert(mr.id);
    }

    groups
}

/// Sort by count, highest first; ties keep their order
pub fn sort_summaries(summaries: &mut [AssigneeSummary]) {
    summaries.sort_by(|a, b| b.count.cmp(&a.count));
}

/// One rendered line of the channel summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    /// Slack mention, email or username
    pub mention: String,
    /// Dashboard link for the assignee
    pub url: String,
    /// Number of distinct MRs
    pub count: usize,
    /// Whether the assignee's account is blocked
    pub blocked: bool,
}

impl SummaryLine {
    /// Line for a summary entry with an already resolved mention
    pub fn new(summary: &AssigneeSummary, mention: String, config: &JobConfig) -> Self {
        Self {
            mention,
            url: config.assignee_dashboard_url(summary.key, &summary.username),
            count: summary.count,
            blocked: summary.is_blocked(),
        }
    }

    /// Render as a Slack mrkdwn bullet
    pub fn render(&self) -> String {
        let mut line = format!(
            "- {} has a count of <{}|{}>",
            self.mention, self.url, self.count
        );
        if self.blocked {
            line.push_str(" - user is BLOCKED :x: please re-assign their merge requests");
        }
        line
    }
}

/// Full channel summary
pub fn render_summary(total: usize, stale_days: u32, lines: &[SummaryLine]) -> String {
    let mut message = format!(
        "Total of *{total}* open merge requests not updated in the last {stale_days} days, in non-archived projects.\n\n\
         _Note: If the numbers below do not match the merge requests in GitLab, you may not have permission to view them._\n\n"
    );
    for line in lines {
        message.push_str(&line.render());
        message.push('\n');
    }
    message
}

/// Project pieces derived from an MR web URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLink {
    /// Project web URL
    pub url: String,
    /// Group path segment
    pub group: String,
    /// Project path segment
    pub project: String,
}

/// Split `<base>/<group>/<project>/-/merge_requests/<iid>` into its project parts
///
/// Positions count from the end, so nested groups keep only their last
/// segment as `group`.
pub fn project_link(web_url: &str) -> Option<ProjectLink> {
    let parts: Vec<&str> = web_url.split('/').collect();
    if parts.len() < 5 {
        return None;
    }
    let n = parts.len();
    Some(ProjectLink {
        url: parts[..n - 3].join("/"),
        group: parts[n - 5].to_string(),
        project: parts[n - 4].to_string(),
    })
}

/// Whole days since `updated_at`, truncated
pub fn age_in_days(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - updated_at).num_days()
}

/// Escape text for Slack mrkdwn
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Assignee details shown when an MR lands in the fallback channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnroutedAssignee {
    /// Assignee's full name (or "Unassigned")
    pub name: String,
    /// Email from GitLab, if any
    pub email: Option<String>,
}

impl UnroutedAssignee {
    /// Details for an MR's current assignee
    pub fn for_merge_request(mr: &MergeRequest, email: Option<String>) -> Self {
        let name = mr
            .assignee
            .as_ref()
            .map_or_else(|| UNASSIGNED.to_string(), |a| a.name.clone());
        Self { name, email }
    }
}

/// Message block for one MR
pub fn render_merge_request(
    mr: &MergeRequest,
    now: DateTime<Utc>,
    unrouted: Option<&UnroutedAssignee>,
) -> String {
    let project = project_link(&mr.web_url).map_or_else(
        || format!("<{}|{}>", mr.web_url, mr.web_url),
        |p| format!("<{}|{}/{}>", p.url, p.group, p.project),
    );

    let mut lines = vec![
        format!("\n\n`Merge Request:` <{}|{}>", mr.web_url, escape(&mr.title)),
        format!("`Project:` {project}"),
        format!(
            "`Last Updated:` {} ({} days ago)",
            mr.updated_at.format("%d-%m-%Y"),
            age_in_days(mr.updated_at, now)
        ),
    ];
    if let Some(assignee) = unrouted {
        lines.push(format!(
            "`Assignee:` {} / {}",
            assignee.name,
            assignee.email.as_deref().unwrap_or("unknown")
        ));
    }
    lines.push(format!("`Status:` {}", mr.status_text()));
    lines.push("---".to_string());

    lines.join("\n")
}

/// Messages gathered per recipient
///
/// Identical message text for the same recipient is stored once.
/// Recipients and messages keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct RecipientBatches {
    batches: Vec<(Recipient, Vec<String>)>,
    seen: HashSet<(Recipient, String)>,
}

impl RecipientBatches {
    /// Empty set of batches
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message; returns `false` if the recipient already has this exact text
    pub fn insert(&mut self, recipient: Recipient, message: String) -> bool {
        if !self.seen.insert((recipient.clone(), message.clone())) {
            return false;
        }
        if let Some((_, messages)) = self.batches.iter_mut().find(|(r, _)| *r == recipient) {
            messages.push(message);
        } else {
            self.batches.push((recipient, vec![message]));
        }
        true
    }

    /// Messages for one recipient
    pub fn get(&self, recipient: &Recipient) -> Option<&[String]> {
        self.batches
            .iter()
            .find(|(r, _)| r == recipient)
            .map(|(_, m)| m.as_slice())
    }

    /// Iterate recipients and their messages
    pub fn iter(&self) -> impl Iterator<Item = (&Recipient, &[String])> {
        self.batches.iter().map(|(r, m)| (r, m.as_slice()))
    }

    /// Number of recipients
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Whether no message was added
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Intro line for a recipient
pub fn intro_for(recipient: &Recipient, stale_days: u32) -> String {
    match recipient {
        Recipient::Fallback => FALLBACK_INTRO.to_string(),
        Recipient::User(_) => format!(
            "You have open merge requests that haven't been updated in the last {stale_days} days. Please review and take appropriate action."
        ),
    }
}

/// Full message for one recipient: intro followed by every block
pub fn render_batch(recipient: &Recipient, messages: &[String], stale_days: u32) -> String {
    let mut text = intro_for(recipient, stale_days);
    text.push_str(&messages.join("\n"));
    text
}
