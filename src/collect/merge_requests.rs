//! Stale merge request collection with auto-assignment

use crate::config::JobConfig;
use crate::platform::{HostingService, PageCursor};
use crate::types::{Group, MergeRequest};
use tracing::{debug, info, warn};

/// Outcome of collecting stale merge requests
#[derive(Debug, Clone, Default)]
pub struct CollectedMergeRequests {
    /// Stale MRs across all groups, in fetch order
    pub merge_requests: Vec<MergeRequest>,
    /// Unassigned MRs handed to their author
    pub assigned: usize,
    /// Assignment requests that failed
    pub assign_failures: usize,
    /// Groups whose listing failed part-way
    pub failed_groups: Vec<String>,
}

/// Collect stale MRs of every group
///
/// Each MR without an assignee is assigned to its author as a side effect.
/// The fetched MR is kept as returned (still unassigned). Assignment
/// failures are logged only. A failing page ends that group's listing but
/// keeps what was already collected.
pub async fn collect_stale_merge_requests(
    hosting: &dyn HostingService,
    config: &JobConfig,
    groups: &[Group],
    updated_before: &str,
) -> CollectedMergeRequests {
    info!(
        stale_days = config.stale_days,
        updated_before, "collecting open MRs in non-archived projects"
    );
    let mut collected = CollectedMergeRequests::default();

    for group in groups {
        let mut cursor = PageCursor::new();
        while let Some(page_number) = cursor.next_page() {
            debug!(group = %group.name, page = page_number, "fetching stale MRs");
            let page = match hosting
                .list_stale_merge_requests(group.id, updated_before, page_number)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(group = %group.name, page = page_number, error = %e, "failed to list MRs for group");
                    collected.failed_groups.push(group.name.clone());
                    break;
                }
            };
            cursor.advance(&page);

            for mr in page.items {
                if mr.assignee.is_none() {
                    assign_to_author(hosting, config, &mr, &mut collected).await;
                }
                collected.merge_requests.push(mr);
            }
        }
    }

    info!(
        count = collected.merge_requests.len(),
        assigned = collected.assigned,
        failed_groups = collected.failed_groups.len(),
        "finished collecting stale MRs"
    );
    collected
}

async fn assign_to_author(
    hosting: &dyn HostingService,
    config: &JobConfig,
    mr: &MergeRequest,
    collected: &mut CollectedMergeRequests,
) {
    let reference = mr.reference();
    if config.dry_run {
        info!(mr = %reference, author = %mr.author.username, "[dry run] would assign MR to its author");
        return;
    }

    match hosting
        .assign_merge_request(mr.project_id, mr.iid, mr.author.id)
        .await
    {
        Ok(()) => {
            info!(mr = %reference, author = %mr.author.username, "assigned unassigned MR to its author");
            collected.assigned += 1;
        }
        Err(e) => {
            warn!(mr = %reference, author = %mr.author.username, error = %e, "failed to assign MR to its author");
            collected.assign_failures += 1;
        }
    }
}
