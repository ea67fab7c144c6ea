//! Configuration commands

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::CliConfig;
use crate::context::Context;
use crate::output::{print_field, print_optional_field, TextDisplay};

/// Configuration inspection commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the endpoint the current settings resolve to
    Show,

    /// Print the default configuration file path
    Path,
}

/// Endpoint settings as resolved for display
#[derive(Debug, Serialize)]
struct ResolvedEndpoint {
    environment: &'static str,
    base_url: String,
    timeout_secs: u64,
    max_attempts: u32,
    retry_delay_ms: u64,
    config_file: Option<String>,
}

/// Execute configuration commands
pub fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Path => {
            match CliConfig::config_path() {
                Some(path) => println!("{}", path.display()),
                None => ctx.output.warning("Could not determine config directory"),
            }
            Ok(())
        }
    }
}

fn show(ctx: &Context) -> Result<()> {
    let endpoint = ctx.endpoint_config();
    endpoint.validate()?;

    let resolved = ResolvedEndpoint {
        environment: ctx.environment().as_str(),
        base_url: endpoint.base_url,
        timeout_secs: endpoint.request_timeout.as_secs(),
        max_attempts: endpoint.max_attempts,
        retry_delay_ms: endpoint.retry_base_delay.as_millis() as u64,
        config_file: ctx
            .config_file
            .as_ref()
            .map(|p| p.display().to_string()),
    };
    ctx.output.write(&resolved)
}

impl TextDisplay for ResolvedEndpoint {
    fn display_text(&self) {
        print_field("Environment", self.environment);
        print_field("Base URL", &self.base_url);
        print_field("Timeout", &format!("{} s", self.timeout_secs));
        print_field("Max attempts", &self.max_attempts.to_string());
        print_field("Retry delay", &format!("{} ms", self.retry_delay_ms));
        print_optional_field("Config file", self.config_file.as_deref());
    }
}
