//! Mock GitLab and Slack services for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use stale_mrs::error::{Error, Result};
use stale_mrs::platform::{ChatService, HostingService, Page};
use stale_mrs::types::{Group, MergeRequest};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Call record for `list_stale_merge_requests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMrsCall {
    pub group_id: u64,
    pub updated_before: String,
    pub page: u32,
}

/// Call record for `assign_merge_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignCall {
    pub project_id: u64,
    pub iid: u64,
    pub user_id: u64,
}

/// Call record for `post_message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCall {
    pub channel: String,
    pub text: String,
}

/// In-memory GitLab
///
/// Pages not configured come back empty. Features:
/// - Configurable pages per group and page number
/// - Call tracking for verification
/// - Error injection per page, per user and for assignments
#[derive(Default)]
pub struct MockHosting {
    group_pages: Mutex<HashMap<u32, Page<Group>>>,
    mr_pages: Mutex<HashMap<(u64, u32), Page<MergeRequest>>>,
    emails: Mutex<HashMap<u64, String>>,
    // Call tracking
    list_groups_calls: Mutex<Vec<u32>>,
    list_mrs_calls: Mutex<Vec<ListMrsCall>>,
    assign_calls: Mutex<Vec<AssignCall>>,
    email_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_group_page: Mutex<Option<u32>>,
    error_on_mr_pages: Mutex<HashSet<(u64, u32)>>,
    error_on_email: Mutex<HashSet<u64>>,
    error_on_assign: Mutex<Option<String>>,
}

impl MockHosting {
    pub fn new() -> Self {
        Self::default()
    }

    // === Response setup ===

    /// Set the groups returned for a page
    pub fn set_group_page(&self, page: u32, groups: Vec<Group>, next_page: Option<u32>) {
        self.group_pages
            .lock()
            .unwrap()
            .insert(page, Page::new(groups, next_page));
    }

    /// Set the MRs returned for a group page
    pub fn set_mr_page(
        &self,
        group_id: u64,
        page: u32,
        mrs: Vec<MergeRequest>,
        next_page: Option<u32>,
    ) {
        self.mr_pages
            .lock()
            .unwrap()
            .insert((group_id, page), Page::new(mrs, next_page));
    }

    /// Set a user's email
    pub fn set_email(&self, user_id: u64, email: &str) {
        self.emails
            .lock()
            .unwrap()
            .insert(user_id, email.to_string());
    }

    // === Error injection methods ===

    /// Make a groups page fail
    pub fn fail_group_page(&self, page: u32) {
        *self.error_on_group_page.lock().unwrap() = Some(page);
    }

    /// Make a group's MR page fail
    pub fn fail_mr_page(&self, group_id: u64, page: u32) {
        self.error_on_mr_pages
            .lock()
            .unwrap()
            .insert((group_id, page));
    }

    /// Make the email lookup for a user fail
    pub fn fail_email(&self, user_id: u64) {
        self.error_on_email.lock().unwrap().insert(user_id);
    }

    /// Make every assignment fail
    pub fn fail_assign(&self, msg: &str) {
        *self.error_on_assign.lock().unwrap() = Some(msg.to_string());
    }

    // === Call tracking ===

    pub fn list_groups_calls(&self) -> Vec<u32> {
        self.list_groups_calls.lock().unwrap().clone()
    }

    pub fn list_mrs_calls(&self) -> Vec<ListMrsCall> {
        self.list_mrs_calls.lock().unwrap().clone()
    }

    pub fn assign_calls(&self) -> Vec<AssignCall> {
        self.assign_calls.lock().unwrap().clone()
    }

    pub fn email_calls(&self) -> Vec<u64> {
        self.email_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostingService for MockHosting {
    async fn list_groups(&self, page: u32) -> Result<Page<Group>> {
        self.list_groups_calls.lock().unwrap().push(page);
        if *self.error_on_group_page.lock().unwrap() == Some(page) {
            return Err(Error::GitLabApi(format!("groups page {page} failed")));
        }
        Ok(self
            .group_pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .unwrap_or_else(|| Page::last(vec![])))
    }

    async fn list_stale_merge_requests(
        &self,
        group_id: u64,
        updated_before: &str,
        page: u32,
    ) -> Result<Page<MergeRequest>> {
        self.list_mrs_calls.lock().unwrap().push(ListMrsCall {
            group_id,
            updated_before: updated_before.to_string(),
            page,
        });
        if self
            .error_on_mr_pages
            .lock()
            .unwrap()
            .contains(&(group_id, page))
        {
            return Err(Error::GitLabApi(format!(
                "group {group_id} page {page} failed"
            )));
        }
        Ok(self
            .mr_pages
            .lock()
            .unwrap()
            .get(&(group_id, page))
            .cloned()
            .unwrap_or_else(|| Page::last(vec![])))
    }

    async fn assign_merge_request(&self, project_id: u64, iid: u64, user_id: u64) -> Result<()> {
        self.assign_calls.lock().unwrap().push(AssignCall {
            project_id,
            iid,
            user_id,
        });
        if let Some(msg) = self.error_on_assign.lock().unwrap().as_ref() {
            return Err(Error::GitLabApi(msg.clone()));
        }
        Ok(())
    }

    async fn get_user_email(&self, user_id: u64) -> Result<Option<String>> {
        self.email_calls.lock().unwrap().push(user_id);
        if self.error_on_email.lock().unwrap().contains(&user_id) {
            return Err(Error::GitLabApi(format!("user {user_id} lookup failed")));
        }
        Ok(self.emails.lock().unwrap().get(&user_id).cloned())
    }
}

/// In-memory Slack
///
/// Unknown emails fail with `users_not_found`.
#[derive(Default)]
pub struct MockChat {
    users: Mutex<HashMap<String, String>>,
    // Call tracking
    posts: Mutex<Vec<PostCall>>,
    lookup_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_lookup: Mutex<HashMap<String, String>>,
    error_on_channels: Mutex<HashSet<String>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Slack user for an email
    pub fn add_user(&self, email: &str, user_id: &str) {
        self.users
            .lock()
            .unwrap()
            .insert(email.to_string(), user_id.to_string());
    }

    /// Make the lookup of an email fail with a Slack error code
    pub fn fail_lookup(&self, email: &str, error: &str) {
        self.error_on_lookup
            .lock()
            .unwrap()
            .insert(email.to_string(), error.to_string());
    }

    /// Make posting to a channel fail
    pub fn fail_post_to(&self, channel: &str) {
        self.error_on_channels
            .lock()
            .unwrap()
            .insert(channel.to_string());
    }

    pub fn posts(&self) -> Vec<PostCall> {
        self.posts.lock().unwrap().clone()
    }

    pub fn posts_to(&self, channel: &str) -> Vec<PostCall> {
        self.posts()
            .into_iter()
            .filter(|p| p.channel == channel)
            .collect()
    }

    pub fn lookup_calls(&self) -> Vec<String> {
        self.lookup_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for MockChat {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        self.posts.lock().unwrap().push(PostCall {
            channel: channel.to_string(),
            text: text.to_string(),
        });
        if self.error_on_channels.lock().unwrap().contains(channel) {
            return Err(Error::SlackApi {
                method: "chat.postMessage",
                error: "channel_not_found".to_string(),
            });
        }
        Ok(())
    }

    async fn lookup_user_by_email(&self, email: &str) -> Result<String> {
        self.lookup_calls.lock().unwrap().push(email.to_string());
        if let Some(error) = self.error_on_lookup.lock().unwrap().get(email) {
            return Err(Error::SlackApi {
                method: "users.lookupByEmail",
                error: error.clone(),
            });
        }
        self.users
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or_else(|| Error::SlackApi {
                method: "users.lookupByEmail",
                error: "users_not_found".to_string(),
            })
    }
}
