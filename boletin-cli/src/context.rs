//! CLI execution context

use anyhow::{Context as _, Result};
use boletin_sdk::{BoletinClient, DeploymentEnvironment, EndpointConfig};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::config::CliConfig;
use crate::logging::LogFormat;
use crate::output::OutputWriter;

/// Execution context for CLI commands
pub struct Context {
    /// Loaded configuration with command line overrides applied
    pub config: CliConfig,

    /// Extra configuration file given on the command line
    pub config_file: Option<PathBuf>,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = CliConfig::load(cli.config.as_deref())?;

        if cli.host.is_some() {
            config.host = cli.host.clone();
        }
        if cli.api_url.is_some() {
            config.api_url = cli.api_url.clone();
        }
        config.timeout_secs = cli.timeout.or(config.timeout_secs);
        config.max_attempts = cli.max_attempts.or(config.max_attempts);
        config.retry_delay_ms = cli.retry_delay_ms.or(config.retry_delay_ms);
        if let Some(format) = cli.output {
            config.output_format = format;
        }
        if let Some(format) = cli.log_format {
            config.log_format = format;
        }

        let output = OutputWriter::new(config.output_format, cli.no_color);

        Ok(Self {
            config,
            config_file: cli.config.clone(),
            output,
            verbose: cli.verbose,
        })
    }

    /// Effective log filter
    pub fn log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.config.log_level
        }
    }

    /// Effective log format
    pub fn log_format(&self) -> LogFormat {
        self.config.log_format
    }

    /// Environment the configured host maps to
    pub fn environment(&self) -> DeploymentEnvironment {
        DeploymentEnvironment::detect(self.config.host.as_deref().unwrap_or_default())
    }

    /// Endpoint configuration for the configured host, with overrides applied
    pub fn endpoint_config(&self) -> EndpointConfig {
        let mut endpoint = self.environment().endpoint_config();

        if let Some(ref url) = self.config.api_url {
            endpoint.base_url = url.clone();
        }
        if let Some(secs) = self.config.timeout_secs {
            endpoint.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = self.config.max_attempts {
            endpoint.max_attempts = attempts;
        }
        if let Some(ms) = self.config.retry_delay_ms {
            endpoint.retry_base_delay = Duration::from_millis(ms);
        }

        endpoint.with_logging(self.verbose)
    }

    /// Create an SDK client
    pub fn create_client(&self) -> Result<BoletinClient> {
        BoletinClient::new(self.endpoint_config()).context("Failed to create API client")
    }
}
