//! stale-mrs: nudge people about stale GitLab merge requests via Slack
//!
//! One run collects the organisation's groups, gathers open merge requests
//! not updated within the threshold, hands unassigned ones to their authors
//! and notifies Slack: a channel summary per assignee plus one message per
//! recipient listing their merge requests.

pub mod auth;
pub mod collect;
pub mod config;
pub mod error;
pub mod job;
pub mod notify;
pub mod platform;
pub mod types;
