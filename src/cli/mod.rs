//! Command line interface
//!
//! Every option can also come from the environment, which is how the
//! scheduler usually provides it.

pub mod context;
pub mod run;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

/// Notify Slack about stale GitLab merge requests
#[derive(Debug, Parser)]
#[command(name = "stale-mrs", version, about)]
pub struct Cli {
    /// GitLab base URL, e.g. `https://gitlab.example.com`
    #[arg(long, env = "GITLAB_BASE_URL")]
    pub gitlab_url: String,

    /// Merge requests not updated for this many days are stale
    #[arg(long, env = "STALE_DAYS_THRESHOLD")]
    pub stale_days: u32,

    /// Slack channel for the summary and unroutable merge requests
    #[arg(long, env = "FALLBACK_CHANNEL_ID")]
    pub fallback_channel: String,

    /// Email domains whose users get direct messages (comma-separated)
    #[arg(long, env = "INTERNAL_EMAIL_DOMAINS", value_delimiter = ',')]
    pub internal_domains: Vec<String>,

    /// Skip groups whose name contains any of these (comma-separated)
    #[arg(long, env = "EXCLUDE_GROUPS", value_delimiter = ',')]
    pub exclude_groups: Vec<String>,

    /// GitLab access token
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: Option<String>,

    /// Slack bot token
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub slack_token: Option<String>,

    /// Timeout for each API request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 180)]
    pub timeout_secs: u64,

    /// Log assignments and messages instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v for debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Trim list entries and drop empty ones (`"a, b,"` -> `["a", "b"]`)
pub fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Install the tracing subscriber; `RUST_LOG` wins over `-v`
pub fn init_logging(verbose: u8) {
    let default_filter = if verbose > 0 {
        "info,stale_mrs=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
