//! Slack Web API service implementation

use crate::error::{Error, Result};
use crate::platform::{ChatService, http_client};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Public Slack Web API endpoint
pub const SLACK_API_URL: &str = "https://slack.com/api";

/// Slack service using reqwest
pub struct SlackService {
    client: Client,
    token: String,
    api_url: String,
}

/// Envelope shared by every Web API response
#[derive(Deserialize)]
struct SlackResponse<T> {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    body: Option<T>,
}

#[derive(Debug, Deserialize)]
struct LookupByEmail {
    user: SlackUser,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Posted {}

impl SlackService {
    /// Create a new Slack service against the public API
    pub fn new(token: String, timeout: Duration) -> Result<Self> {
        Self::with_api_url(SLACK_API_URL, token, timeout)
    }

    /// Create a new Slack service against a custom API URL
    pub fn with_api_url(api_url: &str, token: String, timeout: Duration) -> Result<Self> {
        let client = http_client(timeout)?;

        Ok(Self {
            client,
            token,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_url)
    }

    /// Unwrap the `ok`/`error` envelope
    ///
    /// Slack reports application errors with HTTP 200 and `ok: false`.
    fn unwrap_response<T>(method: &'static str, response: SlackResponse<T>) -> Result<T> {
        if !response.ok {
            return Err(Error::SlackApi {
                method,
                error: response.error.unwrap_or_else(|| "unknown_error".to_string()),
            });
        }
        response.body.ok_or_else(|| Error::SlackApi {
            method,
            error: "malformed_response".to_string(),
        })
    }

    async fn decode<T: DeserializeOwned>(
        method: &'static str,
        response: reqwest::Response,
    ) -> Result<T> {
        let response: SlackResponse<T> = response.error_for_status()?.json().await?;
        Self::unwrap_response(method, response)
    }
}

#[async_trait]
impl ChatService for SlackService {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        const METHOD: &str = "chat.postMessage";
        debug!(channel, len = text.len(), "posting Slack message");

        let response = self
            .client
            .post(self.method_url(METHOD))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "channel": channel,
                "text": text,
                "unfurl_links": false,
            }))
            .send()
            .await?;
        let _: Posted = Self::decode(METHOD, response).await?;

        debug!(channel, "posted Slack message");
        Ok(())
    }

    async fn lookup_user_by_email(&self, email: &str) -> Result<String> {
        const METHOD: &str = "users.lookupByEmail";
        debug!(email, "looking up Slack user");

        let response = self
            .client
            .get(self.method_url(METHOD))
            .bearer_auth(&self.token)
            .query(&[("email", email)])
            .send()
            .await?;
        let found: LookupByEmail = Self::decode(METHOD, response).await?;

        debug!(email, user_id = %found.user.id, "found Slack user");
        Ok(found.user.id)
    }
}
