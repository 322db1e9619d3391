use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "skystats")]
#[command(about = "Check mesh node uptime against a list of node keys", long_about = None)]
pub struct Args {
    /// Uptime feed URL (JSON array of node stats)
    #[arg(long, env = "SKYSTATS_URL")]
    pub url: String,

    /// CSV file holding the node public keys
    #[arg(long, env = "SKYSTATS_KEYS_CSV")]
    pub keys: PathBuf,

    /// HTTP request timeout in seconds (0 disables it)
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Extra attempts after a failed fetch
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Base delay between fetch attempts
    #[arg(long, default_value_t = 500)]
    pub retry_backoff_ms: u64,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Repeat every N seconds instead of running once (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub watch_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Default, Subcommand)]
pub enum Command {
    /// Full uptime report (default)
    #[default]
    Report,
    /// Only the listed nodes missing from the feed
    Missing,
    /// Only the highest uptime in the feed
    Highest,
}
