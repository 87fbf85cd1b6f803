//! Collection stages: groups first, then their stale merge requests
//!
//! The two stages fail differently. Listing groups is all-or-nothing,
//! while merge request collection keeps whatever it gathered before a
//! failing page and moves on to the next group.

mod groups;
mod merge_requests;

pub use groups::{collect_groups, filter_excluded_groups};
pub use merge_requests::{CollectedMergeRequests, collect_stale_merge_requests};
