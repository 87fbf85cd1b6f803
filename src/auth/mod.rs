//! API tokens for GitLab and Slack
//!
//! Tokens are read from flags or the environment. A missing token is not
//! fatal: it is logged and the first API call fails with an
//! authentication error instead.

use std::fmt;
use tracing::{info, warn};

/// Which API a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// GitLab personal or group access token
    GitLab,
    /// Slack bot token
    Slack,
}

impl TokenKind {
    /// Environment variable the token is read from
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::GitLab => "GITLAB_TOKEN",
            Self::Slack => "SLACK_TOKEN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitLab => write!(f, "GitLab"),
            Self::Slack => write!(f, "Slack"),
        }
    }
}

/// Use the configured token, or an empty one after logging a warning
pub fn resolve_token(kind: TokenKind, value: Option<String>) -> String {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(token) => {
            info!(%kind, "{kind} token configured");
            token.trim().to_string()
        }
        None => {
            warn!(%kind, "no {kind} token set ({}); API calls will fail to authenticate", kind.env_var());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_token_trims() {
        assert_eq!(
            resolve_token(TokenKind::GitLab, Some(" glpat-abc \n".to_string())),
            "glpat-abc"
        );
    }

    #[test]
    fn test_missing_token_is_empty() {
        assert_eq!(resolve_token(TokenKind::Slack, None), "");
        assert_eq!(resolve_token(TokenKind::Slack, Some("   ".to_string())), "");
    }

    #[test]
    fn test_flag_value_used_without_env() {
        assert_eq!(
            resolve_token(TokenKind::Slack, Some("xoxb-from-flag".to_string())),
            "xoxb-from-flag"
        );
    }
}
