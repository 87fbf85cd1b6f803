//! stale-mrs - notify Slack about stale GitLab merge requests

mod cli;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    cli::init_logging(args.verbose);
    cli::run::run_once(&args).await
}
