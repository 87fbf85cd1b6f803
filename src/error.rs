//! Error types for stale-mrs

use thiserror::Error;

/// Errors raised while talking to GitLab or Slack
#[derive(Debug, Error)]
pub enum Error {
    /// GitLab answered with a non-success status
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// Slack answered with `ok: false`
    #[error("Slack API error calling {method}: {error}")]
    SlackApi {
        /// Web API method, e.g. `users.lookupByEmail`
        method: &'static str,
        /// Error code returned by Slack, e.g. `users_not_found`
        error: String,
    },

    /// Transport failure (connect, timeout, decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether Slack reported that no user matches the looked-up email
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SlackApi { error, .. } if error == "users_not_found")
    }
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
