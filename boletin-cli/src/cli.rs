//! Command line definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::analyze::AnalyzeArgs;
use crate::commands::config::ConfigCommands;
use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// Ask the analysis service about the official bulletin of a given day
#[derive(Debug, Parser)]
#[command(name = "boletin", version, about, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Host the front end is deployed on; selects the endpoint defaults
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Override the service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Total attempts per request, including the first
    #[arg(long, global = true, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Backoff unit between attempts in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    /// Read settings from this file in addition to the default one
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log at debug level, including request and response bodies
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze the bulletin published on a date
    Analyze(AnalyzeArgs),

    /// Check that the analysis service is up
    Health,

    /// Inspect the effective configuration
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "boletin",
            "analyze",
            "--date",
            "2024-12-15",
            "--force",
            "--host",
            "localhost",
        ])
        .unwrap();

        assert_eq!(cli.host.as_deref(), Some("localhost"));
        match cli.command {
            Commands::Analyze(args) => {
                assert!(args.force);
                assert_eq!(args.date.map(|d| d.to_string()).as_deref(), Some("2024-12-15"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(Cli::try_parse_from(["boletin", "health", "--max-attempts", "0"]).is_err());
    }
}
