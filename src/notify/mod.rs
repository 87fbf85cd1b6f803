//! Notification stage: channel summary plus per-recipient messages
//!
//! Two phases, mirroring each other:
//! 1. Plan - group, sort and render (pure, see [`plan`])
//! 2. Deliver - resolve emails and Slack IDs, then post (effectful)

mod deliver;
pub mod plan;

pub use deliver::{
    DeliveryReport, build_summaries, plan_individual_messages, resolve_mention,
    route_merge_request, send_individual_messages, send_summary,
};
pub use plan::{
    AssigneeGroup, FALLBACK_INTRO, ProjectLink, RecipientBatches, SummaryLine, UNASSIGNED,
    UnroutedAssignee, age_in_days, group_by_assignee, intro_for, project_link, render_batch,
    render_merge_request, render_summary, sort_summaries,
};
