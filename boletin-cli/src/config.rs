//! CLI configuration management
//!
//! Settings are layered, later sources winning: built-in defaults, the
//! `config.toml` in the platform config directory, an explicit `--config`
//! file, then `BOLETIN_*` environment variables. Command line flags are
//! applied on top by [`crate::context::Context`].

use anyhow::{Context as _, Result};
use config::{Config as ConfigLoader, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// Prefix of the environment variables read as settings
pub const ENV_PREFIX: &str = "BOLETIN";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Host descriptor used to pick endpoint defaults
    pub host: Option<String>,

    /// Service base URL, replacing the one the host maps to
    pub api_url: Option<String>,

    /// Per-attempt timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Total attempts per request
    pub max_attempts: Option<u32>,

    /// Backoff unit in milliseconds
    pub retry_delay_ms: Option<u64>,

    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,

    /// Log line format
    pub log_format: LogFormat,

    /// Default output format
    pub output_format: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_url: None,
            timeout_secs: None,
            max_attempts: None,
            retry_delay_ms: None,
            log_level: "warn".to_string(),
            log_format: LogFormat::default(),
            output_format: OutputFormat::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from the default location, an optional extra
    /// file, and the environment
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigLoader::builder();

        if let Some(path) = Self::config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path).required(true));
        }

        let loaded = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        loaded
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Get the configuration file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "boletin", "boletin-cli")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.host.is_none());
        assert!(config.api_url.is_none());
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.output_format, OutputFormat::Text);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
host = "localhost"
timeout_secs = 12
max_attempts = 4
output_format = "json"
"#
        )
        .unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.host.as_deref(), Some("localhost"));
        assert_eq!(config.timeout_secs, Some(12));
        assert_eq!(config.max_attempts, Some(4));
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = CliConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
