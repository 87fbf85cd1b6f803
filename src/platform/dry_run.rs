//! Chat service wrapper that logs messages instead of posting them

use crate::error::Result;
use crate::platform::ChatService;
use async_trait::async_trait;
use tracing::info;

/// Forwards lookups to the wrapped service but never posts
pub struct DryRunChat<C> {
    inner: C,
}

impl<C: ChatService> DryRunChat<C> {
    /// Wrap a chat service
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: ChatService> ChatService for DryRunChat<C> {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        info!(channel, "[dry run] would post message:\n{text}");
        Ok(())
    }

    async fn lookup_user_by_email(&self, email: &str) -> Result<String> {
        self.inner.lookup_user_by_email(email).await
    }
}
