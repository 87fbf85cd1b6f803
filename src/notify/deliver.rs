//! Notification delivery - resolving identities and posting messages
//!
//! Every failure here is logged and replaced by a fallback: a missing
//! email hides the mention, an unknown Slack user routes to the fallback
//! channel, and a failed post does not stop the remaining posts.

use crate::config::JobConfig;
use crate::notify::plan::{
    SummaryLine, UnroutedAssignee, group_by_assignee, render_batch, render_merge_request,
    render_summary, sort_summaries,
};
use crate::notify::RecipientBatches;
use crate::platform::{ChatService, HostingService};
use crate::types::{AssigneeSummary, MergeRequest, Recipient};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Outcome of the per-recipient fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Recipients with at least one message
    pub recipients: usize,
    /// Messages posted successfully
    pub sent: usize,
    /// Messages that failed to post
    pub failed: usize,
}

async fn fetch_email(hosting: &dyn HostingService, user_id: u64) -> Option<String> {
    match hosting.get_user_email(user_id).await {
        Ok(email) => email,
        Err(e) => {
            warn!(user_id, error = %e, "failed to get GitLab user email");
            None
        }
    }
}

/// Group MRs by assignee, resolve each assignee's email once, and sort
pub async fn build_summaries(
    merge_requests: &[MergeRequest],
    hosting: &dyn HostingService,
) -> Vec<AssigneeSummary> {
    let mut summaries = Vec::new();
    for group in group_by_assignee(merge_requests) {
        debug!(
            assignee = %group.key,
            merge_requests = group.merge_request_ids.len(),
            "summarizing assignee"
        );
        let email = match group.assignee.as_ref() {
            Some(assignee) => fetch_email(hosting, assignee.id).await,
            None => None,
        };
        summaries.push(group.into_summary(email));
    }
    sort_summaries(&mut summaries);
    summaries
}

/// Text identifying the assignee in the summary
///
/// Internal emails become a Slack mention. Otherwise, or when the lookup
/// fails, the raw email (or username when no email is known) is shown.
pub async fn resolve_mention(
    summary: &AssigneeSummary,
    config: &JobConfig,
    chat: &dyn ChatService,
) -> String {
    let Some(email) = summary.email.as_deref() else {
        return summary.username.clone();
    };
    if !config.is_internal_email(email) {
        return email.to_string();
    }

    match chat.lookup_user_by_email(email).await {
        Ok(user_id) => format!("<@{user_id}>"),
        Err(e) => {
            warn!(email, error = %e, "failed to create Slack mention");
            email.to_string()
        }
    }
}

/// Build and post the channel summary
///
/// Returns whether the summary was posted.
pub async fn send_summary(
    merge_requests: &[MergeRequest],
    config: &JobConfig,
    hosting: &dyn HostingService,
    chat: &dyn ChatService,
) -> bool {
    let summaries = build_summaries(merge_requests, hosting).await;

    let mut lines = Vec::with_capacity(summaries.len());
    for summary in &summaries {
        let mention = resolve_mention(summary, config, chat).await;
        lines.push(SummaryLine::new(summary, mention, config));
    }
    let message = render_summary(merge_requests.len(), config.stale_days, &lines);

    match chat.post_message(&config.fallback_channel, &message).await {
        Ok(()) => {
            info!(channel = %config.fallback_channel, assignees = lines.len(), "sent summary");
            true
        }
        Err(e) => {
            warn!(channel = %config.fallback_channel, error = %e, "failed to send summary");
            false
        }
    }
}

/// Decide where an MR's notification goes
///
/// Returns the recipient and the assignee email used to decide.
pub async fn route_merge_request(
    mr: &MergeRequest,
    config: &JobConfig,
    hosting: &dyn HostingService,
    chat: &dyn ChatService,
) -> (Recipient, Option<String>) {
    let Some(assignee) = mr.assignee.as_ref() else {
        warn!(mr = %mr.reference(), "MR has no assignee");
        return (Recipient::Fallback, None);
    };

    let Some(email) = fetch_email(hosting, assignee.id).await else {
        warn!(assignee_id = assignee.id, "couldn't get email for assignee");
        return (Recipient::Fallback, None);
    };
    if !config.is_internal_email(&email) {
        info!(email = %email, "email domain not in allowed list");
        return (Recipient::Fallback, Some(email));
    }

    match chat.lookup_user_by_email(&email).await {
        Ok(user_id) => (Recipient::User(user_id), Some(email)),
        Err(e) => {
            if e.is_not_found() {
                warn!(email = %email, "no Slack user with this email");
            } else {
                warn!(email = %email, error = %e, "failed to find Slack user for direct message");
            }
            (Recipient::Fallback, Some(email))
        }
    }
}

/// Route and render every MR into per-recipient batches
pub async fn plan_individual_messages(
    merge_requests: &[MergeRequest],
    config: &JobConfig,
    hosting: &dyn HostingService,
    chat: &dyn ChatService,
    now: DateTime<Utc>,
) -> RecipientBatches {
    let mut batches = RecipientBatches::new();
    for mr in merge_requests {
        let (recipient, email) = route_merge_request(mr, config, hosting, chat).await;
        let unrouted = (recipient == Recipient::Fallback)
            .then(|| UnroutedAssignee::for_merge_request(mr, email));
        let message = render_merge_request(mr, now, unrouted.as_ref());
        batches.insert(recipient, message);
    }
    batches
}

/// Send one message per recipient
pub async fn send_individual_messages(
    merge_requests: &[MergeRequest],
    config: &JobConfig,
    hosting: &dyn HostingService,
    chat: &dyn ChatService,
    now: DateTime<Utc>,
) -> DeliveryReport {
    let batches = plan_individual_messages(merge_requests, config, hosting, chat, now).await;
    let mut report = DeliveryReport {
        recipients: batches.len(),
        ..DeliveryReport::default()
    };

    for (recipient, messages) in batches.iter() {
        let text = render_batch(recipient, messages, config.stale_days);
        let channel = recipient.channel(&config.fallback_channel);
        info!(%recipient, merge_requests = messages.len(), "sending stale MR message");

        match chat.post_message(channel, &text).await {
            Ok(()) => {
                info!(%recipient, "sent stale MR message");
                report.sent += 1;
            }
            Err(e) => {
                warn!(%recipient, error = %e, "failed to send stale MR message");
                report.failed += 1;
            }
        }
    }

    report
}
