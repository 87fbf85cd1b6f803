//! One invocation of the stale merge request job
//!
//! Strictly sequential: groups, then stale merge requests, then the
//! summary and the per-recipient messages. Nothing is remembered between
//! runs, so running twice notifies twice.

use crate::collect::{collect_groups, collect_stale_merge_requests};
use crate::config::JobConfig;
use crate::notify::{DeliveryReport, send_individual_messages, send_summary};
use crate::platform::{ChatService, HostingService};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    /// Groups scanned after exclusions
    pub groups: usize,
    /// Stale MRs found
    pub merge_requests: usize,
    /// Unassigned MRs assigned to their author
    pub assigned: usize,
    /// Assignment requests that failed
    pub assign_failures: usize,
    /// Whether the channel summary was posted
    pub summary_sent: bool,
    /// Per-recipient delivery outcome
    pub delivery: DeliveryReport,
}

/// Run the job once, treating `now` as the current time
pub async fn run(
    config: &JobConfig,
    hosting: &dyn HostingService,
    chat: &dyn ChatService,
    now: DateTime<Utc>,
) -> JobReport {
    let mut report = JobReport::default();
    let updated_before = config.updated_before(now);

    let groups = match collect_groups(hosting, config.exclude_groups.as_slice()).await {
        Ok(groups) => groups,
        Err(e) => {
            warn!(error = %e, "failed to get GitLab groups");
            Vec::new()
        }
    };
    if groups.is_empty() {
        info!("no groups retrieved, nothing to do");
        return report;
    }
    report.groups = groups.len();

    let collected = collect_stale_merge_requests(hosting, config, &groups, &updated_before).await;
    report.assigned = collected.assigned;
    report.assign_failures = collected.assign_failures;
    let merge_requests = collected.merge_requests;
    if merge_requests.is_empty() {
        info!("no stale merge requests found");
        return report;
    }
    report.merge_requests = merge_requests.len();
    info!(
        count = merge_requests.len(),
        stale_days = config.stale_days,
        "open MRs not updated within threshold, in non-archived projects"
    );

    report.summary_sent = send_summary(&merge_requests, config, hosting, chat).await;
    report.delivery = send_individual_messages(&merge_requests, config, hosting, chat, now).await;

    info!(
        recipients = report.delivery.recipients,
        sent = report.delivery.sent,
        failed = report.delivery.failed,
        "stale merge request check completed"
    );
    report
}
