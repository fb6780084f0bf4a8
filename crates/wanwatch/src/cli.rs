//! Clap derive structures for the `wanwatch` binary.

use std::path::PathBuf;

use clap::Parser;

/// wanwatch -- push a notification whenever the primary WAN goes down or comes back
#[derive(Debug, Parser)]
#[command(
    name = "wanwatch",
    version,
    about = "Watch a UniFi gateway's primary WAN and notify ntfy on transitions",
    long_about = "Polls the UniFi controller's alarm log for WAN transition alarms on the\n\
        primary interface and publishes one ntfy message per up/down change.\n\n\
        Settings come from a TOML file and UNTFY_* environment variables."
)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, short = 'c', env = "UNTFY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run a single poll cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Print the effective configuration (passwords masked) and exit
    #[arg(long)]
    pub print_config: bool,
}
