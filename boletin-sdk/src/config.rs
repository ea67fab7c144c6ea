//! Endpoint configuration
//!
//! This module provides the per-deployment settings the request engine runs
//! with, and the resolver that picks them from an environment descriptor.

use crate::error::{SdkError, SdkResult};
use std::time::Duration;

/// Base address of the local development backend
pub const LOCAL_BASE_URL: &str = "http://localhost:3000/api";

/// Base address of the staging backend used by preview deployments
pub const STAGING_BASE_URL: &str = "https://your-staging-api.amazonaws.com/dev";

/// Base address of the production backend
pub const PRODUCTION_BASE_URL: &str = "https://your-api-gateway-url.amazonaws.com/prod";

const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1"];
const PREVIEW_DOMAINS: &[&str] = &["vercel.app", "netlify.app"];

/// Configuration for the request engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Base URL for the API
    pub base_url: String,

    /// Upper bound for a single attempt, from connect to last body byte
    pub request_timeout: Duration,

    /// Total number of attempts per call, including the first
    pub max_attempts: u32,

    /// Backoff unit; the wait after attempt `k` is `k` times this
    pub retry_base_delay: Duration,

    /// Log request and response bodies at debug level
    pub enable_logging: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        DeploymentEnvironment::Production.endpoint_config()
    }
}

impl EndpointConfig {
    /// Create a new configuration with the given base URL and production defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Resolve the configuration for an environment descriptor such as the
    /// current host name. Unrecognized descriptors get the production mapping.
    pub fn resolve(host: &str) -> Self {
        DeploymentEnvironment::detect(host).endpoint_config()
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the total number of attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the backoff unit
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Enable request/response body logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Delay to wait after the given (1-based) attempt failed
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.retry_base_delay.saturating_mul(attempt)
    }

    /// Validate the configuration
    pub fn validate(&self) -> SdkResult<()> {
        if self.base_url.is_empty() {
            return Err(SdkError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SdkError::ConfigurationError(format!(
                "Unsupported URL scheme: {}",
                url.scheme()
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(SdkError::ConfigurationError(
                "Timeout cannot be zero".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(SdkError::ConfigurationError(
                "At least one attempt is required".to_string(),
            ));
        }

        Ok(())
    }
}

/// Deployment target the front end is running under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentEnvironment {
    /// Loopback host during development
    Local,
    /// Preview deployments on hosted static platforms
    Staging,
    /// Everything else
    Production,
}

impl DeploymentEnvironment {
    /// Detect the environment from a host name. Schemes, ports and
    /// surrounding whitespace are ignored.
    pub fn detect(host: &str) -> Self {
        let host = normalize_host(host);

        if LOOPBACK_HOSTS.contains(&host.as_str()) {
            return DeploymentEnvironment::Local;
        }

        let is_preview = PREVIEW_DOMAINS
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")));
        if is_preview {
            DeploymentEnvironment::Staging
        } else {
            DeploymentEnvironment::Production
        }
    }

    /// Endpoint settings for this environment
    pub fn endpoint_config(self) -> EndpointConfig {
        let (base_url, timeout_secs, max_attempts) = match self {
            DeploymentEnvironment::Local => (LOCAL_BASE_URL, 30, 2),
            DeploymentEnvironment::Staging => (STAGING_BASE_URL, 45, 3),
            DeploymentEnvironment::Production => (PRODUCTION_BASE_URL, 60, 3),
        };

        EndpointConfig {
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(timeout_secs),
            max_attempts,
            retry_base_delay: Duration::from_secs(1),
            enable_logging: false,
        }
    }

    /// Short lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentEnvironment::Local => "local",
            DeploymentEnvironment::Staging => "staging",
            DeploymentEnvironment::Production => "production",
        }
    }
}

fn normalize_host(raw: &str) -> String {
    let raw = raw.trim().to_ascii_lowercase();

    if raw.contains("://") {
        if let Some(host) = url::Url::parse(&raw)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        {
            return host.trim_start_matches('[').trim_end_matches(']').to_string();
        }
    }

    // [::1]:8080 or [::1]
    if let Some(rest) = raw.strip_prefix('[') {
        return rest.split(']').next().unwrap_or_default().to_string();
    }

    // host:port, but leave bare IPv6 literals alone
    match raw.split_once(':') {
        Some((host, port)) if !port.contains(':') => host.to_string(),
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EndpointConfig::default();
        assert_eq!(config.base_url, PRODUCTION_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_base_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_detect_environment() {
        assert_eq!(DeploymentEnvironment::detect("localhost"), DeploymentEnvironment::Local);
        assert_eq!(DeploymentEnvironment::detect("127.0.0.1"), DeploymentEnvironment::Local);
        assert_eq!(DeploymentEnvironment::detect("::1"), DeploymentEnvironment::Local);
        assert_eq!(DeploymentEnvironment::detect("[::1]:8080"), DeploymentEnvironment::Local);
        assert_eq!(DeploymentEnvironment::detect(" LocalHost:5173 "), DeploymentEnvironment::Local);
        assert_eq!(
            DeploymentEnvironment::detect("http://localhost:3000/index.html"),
            DeploymentEnvironment::Local
        );
        assert_eq!(
            DeploymentEnvironment::detect("boletin-git-main.vercel.app"),
            DeploymentEnvironment::Staging
        );
        assert_eq!(
            DeploymentEnvironment::detect("https://deploy-preview-4--boletin.netlify.app"),
            DeploymentEnvironment::Staging
        );
        assert_eq!(
            DeploymentEnvironment::detect("boletin.example.com"),
            DeploymentEnvironment::Production
        );
        assert_eq!(DeploymentEnvironment::detect(""), DeploymentEnvironment::Production);
        assert_eq!(
            DeploymentEnvironment::detect("notvercel.app"),
            DeploymentEnvironment::Production
        );
    }

    #[test]
    fn test_resolve_policy_table() {
        let local = EndpointConfig::resolve("localhost");
        assert_eq!(local.base_url, LOCAL_BASE_URL);
        assert_eq!(local.request_timeout, Duration::from_secs(30));
        assert_eq!(local.max_attempts, 2);

        let staging = EndpointConfig::resolve("my-app.netlify.app");
        assert_eq!(staging.base_url, STAGING_BASE_URL);
        assert_eq!(staging.request_timeout, Duration::from_secs(45));
        assert_eq!(staging.max_attempts, 3);

        let production = EndpointConfig::resolve("t.me");
        assert_eq!(production, EndpointConfig::default());
    }

    #[test]
    fn test_backoff_is_linear() {
        let config = EndpointConfig::default().with_retry_base_delay(Duration::from_millis(250));
        assert_eq!(config.backoff_delay(1), Duration::from_millis(250));
        assert_eq!(config.backoff_delay(2), Duration::from_millis(500));
        assert_eq!(config.backoff_delay(3), Duration::from_millis(750));
    }

    #[test]
    fn test_config_builder() {
        let config = EndpointConfig::new("https://api.example.com")
            .with_timeout(Duration::from_secs(5))
            .with_max_attempts(4)
            .with_logging(true);

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_attempts, 4);
        assert!(config.enable_logging);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        assert!(EndpointConfig::new("").validate().is_err());
        assert!(EndpointConfig::new("not a url").validate().is_err());
        assert!(EndpointConfig::new("ftp://example.com").validate().is_err());
        assert!(EndpointConfig::new("https://api.example.com")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(EndpointConfig::new("https://api.example.com")
            .with_max_attempts(0)
            .validate()
            .is_err());
    }
}
