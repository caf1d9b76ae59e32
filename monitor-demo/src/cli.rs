use std::path::PathBuf;

use clap::Parser;

/// Run a monitoring session against a simulated camera and print alerts as
/// JSON lines.
#[derive(Debug, Parser)]
#[command(name = "monitor-demo", version)]
pub struct Args {
    /// JSON configuration file (width, height, facingPreference, pollIntervalMs, ...)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// How long to monitor before stopping
    #[arg(long, default_value_t = 10)]
    pub duration_secs: u64,

    /// Override the poll interval from the configuration
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Simulate the user refusing camera access
    #[arg(long)]
    pub deny_permission: bool,

    /// Simulated time the user takes to answer the permission prompt
    #[arg(long, default_value_t = 0)]
    pub permission_delay_ms: u64,

    /// Seed for the stand-in detector
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON session report here on exit
    #[arg(long)]
    pub report: Option<PathBuf>,
}
