//! Run command - one pass of the stale merge request job

use crate::cli::Cli;
use crate::cli::context::JobContext;
use chrono::Utc;
use stale_mrs::job;
use tracing::info;

/// Run the job once
///
/// Only setup errors are returned; failures during the run are logged and
/// reflected in the report.
pub async fn run_once(args: &Cli) -> anyhow::Result<()> {
    let ctx = JobContext::from_cli(args)?;

    if ctx.config.dry_run {
        info!("dry run: no assignments or Slack messages will be sent");
    }

    let report = job::run(&ctx.config, &ctx.hosting, ctx.chat.as_ref(), Utc::now()).await;

    info!(
        groups = report.groups,
        merge_requests = report.merge_requests,
        assigned = report.assigned,
        assign_failures = report.assign_failures,
        summary_sent = report.summary_sent,
        messages_sent = report.delivery.sent,
        messages_failed = report.delivery.failed,
        "run finished"
    );
    Ok(())
}
