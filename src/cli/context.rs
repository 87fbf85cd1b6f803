//! Shared setup for a run
//!
//! Turns parsed arguments into the job configuration and the platform
//! clients, so the run itself only sees library types.

use crate::cli::{Cli, clean_list};
use stale_mrs::auth::{TokenKind, resolve_token};
use stale_mrs::config::JobConfig;
use stale_mrs::error::Result;
use stale_mrs::platform::{ChatService, DryRunChat, GitLabService, SlackService};
use std::time::Duration;

/// Everything one run needs
pub struct JobContext {
    /// Job configuration
    pub config: JobConfig,
    /// GitLab client
    pub hosting: GitLabService,
    /// Slack client (logging-only in dry run)
    pub chat: Box<dyn ChatService>,
}

impl JobContext {
    /// Build the configuration and clients from command line arguments
    pub fn from_cli(args: &Cli) -> Result<Self> {
        let config = JobConfig::new(&args.gitlab_url, args.stale_days, &args.fallback_channel)?
            .with_internal_domains(clean_list(&args.internal_domains))
            .with_exclude_groups(clean_list(&args.exclude_groups))
            .with_request_timeout(Duration::from_secs(args.timeout_secs))
            .with_dry_run(args.dry_run);

        let gitlab_token = resolve_token(TokenKind::GitLab, args.gitlab_token.clone());
        let slack_token = resolve_token(TokenKind::Slack, args.slack_token.clone());

        let hosting = GitLabService::new(&config.gitlab_url, gitlab_token, config.request_timeout)?;
        let slack = SlackService::new(slack_token, config.request_timeout)?;
        let chat: Box<dyn ChatService> = if config.dry_run {
            Box::new(DryRunChat::new(slack))
        } else {
            Box::new(slack)
        };

        Ok(Self {
            config,
            hosting,
            chat,
        })
    }
}
