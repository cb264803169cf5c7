use clap::{Parser, Subcommand};

use crate::feed::DEFAULT_LOOKBACK_MINUTES;

/// Earthquake alert CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "quake-alert",
    version,
    about = "Checks the USGS feed for recent earthquakes and alerts subscribers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check for earthquakes reported in the last MINUTES minutes
    Check {
        /// Lookback window in minutes
        #[arg(
            default_value_t = DEFAULT_LOOKBACK_MINUTES,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        minutes: u32,

        /// Log the alerts instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_defaults_to_thirty_minutes() {
        let cli = Cli::try_parse_from(["quake-alert", "check"]).unwrap();
        let Command::Check { minutes, dry_run } = cli.command;
        assert_eq!(minutes, 30);
        assert!(!dry_run);
    }

    #[test]
    fn check_accepts_minutes_and_dry_run() {
        let cli = Cli::try_parse_from(["quake-alert", "check", "90", "--dry-run"]).unwrap();
        let Command::Check { minutes, dry_run } = cli.command;
        assert_eq!(minutes, 90);
        assert!(dry_run);
    }

    #[test]
    fn zero_minutes_is_rejected() {
        assert!(Cli::try_parse_from(["quake-alert", "check", "0"]).is_err());
    }
}
