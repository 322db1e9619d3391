mod args;
mod output;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use skystats_common::telemetry::init_tracing;
use skystats_core::{FeedOptions, RetryPolicy, StatsFeed, StatsReconciler};

use crate::args::{Args, Command};
use crate::output::{print_highest, print_json, print_missing, print_report};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing("info");

    let args = Args::parse();
    let opts = FeedOptions {
        timeout: (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs)),
        retry: RetryPolicy::with_retries(
            args.retries,
            Duration::from_millis(args.retry_backoff_ms),
        ),
    };
    let command = args.command.unwrap_or_default();

    let mut reconciler = StatsReconciler::from_url(args.url.clone(), args.keys.clone(), opts)?;

    let Some(secs) = args.watch_secs else {
        return run_once(&mut reconciler, command, args.json).await;
    };

    info!(url = %args.url, interval_secs = secs, "watching uptime feed");
    loop {
        if let Err(e) = run_once(&mut reconciler, command, args.json).await {
            error!("reconciliation failed: {e:#}");
        }
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}

async fn run_once<F: StatsFeed>(
    reconciler: &mut StatsReconciler<F>,
    command: Command,
    json: bool,
) -> Result<()> {
    reconciler.reconcile().await?;

    match command {
        Command::Report => {
            let report = reconciler.report()?;
            info!(
                found = report.total_online,
                missing = report.missing.len(),
                "report ready"
            );
            if json {
                print_json(&report)?;
            } else {
                print_report(&report)?;
            }
        }
        Command::Missing => {
            let report = reconciler.report()?;
            if json {
                print_json(&report.missing)?;
            } else {
                print_missing(&report)?;
            }
        }
        Command::Highest => {
            let highest = reconciler.highest_uptime();
            if json {
                print_json(&serde_json::json!({ "highest_uptime": highest }))?;
            } else {
                print_highest(highest);
            }
        }
    }
    Ok(())
}
