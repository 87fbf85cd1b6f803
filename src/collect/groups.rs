//! Group collection

use crate::error::Result;
use crate::platform::{HostingService, PageCursor};
use crate::types::Group;
use tracing::{debug, info};

/// Split groups into those to scan and those excluded by keyword
///
/// A group is excluded when its name contains any keyword as a
/// case-sensitive substring. Order is preserved in both halves.
pub fn filter_excluded_groups<S: AsRef<str>>(
    groups: Vec<Group>,
    keywords: &[S],
) -> (Vec<Group>, Vec<Group>) {
    groups.into_iter().partition(|group| {
        !keywords
            .iter()
            .any(|keyword| group.name.contains(keyword.as_ref()))
    })
}

/// Fetch every group and drop the excluded ones
///
/// Any failing page aborts the whole collection; callers treat the error
/// as "no groups".
pub async fn collect_groups<S: AsRef<str> + Sync>(
    hosting: &dyn HostingService,
    exclude_keywords: &[S],
) -> Result<Vec<Group>> {
    info!("collecting GitLab groups");
    let mut all_groups = Vec::new();
    let mut cursor = PageCursor::new();

    while let Some(page_number) = cursor.next_page() {
        debug!(page = page_number, "fetching groups page");
        let page = hosting.list_groups(page_number).await?;
        cursor.advance(&page);
        all_groups.extend(page.items);
    }

    let (kept, removed) = filter_excluded_groups(all_groups, exclude_keywords);
    for group in &removed {
        info!(group = %group.name, "excluding group by keyword");
    }

    info!(
        kept = kept.len(),
        excluded = removed.len(),
        "collected GitLab groups"
    );
    Ok(kept)
}
