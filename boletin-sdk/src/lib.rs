//! Boletin SDK
//!
//! This crate provides a resilient Rust client for the service that analyzes
//! the official government bulletin of a given day. The service does the
//! analysis; this crate gets a request to it and a result back reliably.
//!
//! # Features
//!
//! - **Environment-aware endpoints**: the base address, timeout and attempt
//!   budget are resolved from the host the front end runs on
//! - **Per-attempt timeouts**: a stalled attempt is aborted, not waited on
//! - **Bounded retries**: linear backoff, no retry for rejected requests
//! - **Classified errors**: every failure is one of five [`ErrorKind`]s
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use boletin_sdk::{AnalysisRequest, BoletinClient};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BoletinClient::for_host("localhost")?;
//!
//!     let date = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
//!     let report = client.analysis().analyze(&AnalysisRequest::new(date)).await?;
//!     println!("{}", report.analysis.summary);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use boletin_sdk::{AnalysisRequest, BoletinClient, ErrorKind};
//!
//! async fn handle_errors(client: &BoletinClient, request: AnalysisRequest) {
//!     match client.analysis().analyze(&request).await {
//!         Ok(report) => println!("{} changes", report.analysis.key_changes.len()),
//!         Err(e) if e.kind() == ErrorKind::ClientRequestError => {
//!             eprintln!("Rejected: {}", e.message())
//!         }
//!         Err(e) => eprintln!("{} ({} attempts)", e.kind().user_message(), e.attempts()),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod resources;

// Re-export main types for convenience
pub use client::{CallResult, HttpClient};
pub use config::{DeploymentEnvironment, EndpointConfig};
pub use error::{classify, ClassifiedError, ErrorKind, FailureSignal, SdkError, SdkResult};

// Re-export resource clients
pub use resources::analysis::{
    AnalysisClient, AnalysisMetadata, AnalysisReport, AnalysisRequest, BulletinAnalysis,
    ExpertOpinion, FutureDateError, ImpactLevel, NormativeChange,
};
pub use resources::health::{HealthClient, HealthStatus};

/// The main client for the bulletin analysis service.
///
/// Owns one request engine and the endpoint configuration it runs with.
///
/// # Example
///
/// ```rust,no_run
/// use boletin_sdk::BoletinClient;
/// use std::time::Duration;
///
/// let client = BoletinClient::builder("https://api.example.com/prod")
///     .with_timeout(Duration::from_secs(20))
///     .with_max_attempts(2)
///     .build()?;
///
/// let analysis = client.analysis();
/// let health = client.health();
/// # Ok::<(), boletin_sdk::SdkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BoletinClient {
    http_client: HttpClient,
}

impl BoletinClient {
    /// Create a new client with the given configuration.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: EndpointConfig) -> SdkResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(config)?,
        })
    }

    /// Create a client for the deployment the given host belongs to
    pub fn for_host(host: &str) -> SdkResult<Self> {
        let environment = DeploymentEnvironment::detect(host);
        tracing::debug!(host, environment = environment.as_str(), "Resolved endpoint");
        Self::new(environment.endpoint_config())
    }

    /// Create a new client using a builder pattern
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Analysis operations
    pub fn analysis(&self) -> AnalysisClient<'_> {
        AnalysisClient::new(&self.http_client)
    }

    /// Health check
    pub fn health(&self) -> HealthClient<'_> {
        HealthClient::new(&self.http_client)
    }

    /// Get a reference to the underlying HTTP client.
    ///
    /// This is useful for operations not covered by the resource clients.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Replace the endpoint configuration for subsequent calls
    pub fn update_configuration(&mut self, config: EndpointConfig) -> SdkResult<()> {
        self.http_client.update_configuration(config)
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.http_client.config().base_url
    }
}

/// Builder for creating a BoletinClient with fluent configuration.
#[derive(Debug)]
pub struct ClientBuilder {
    config: EndpointConfig,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: EndpointConfig::new(base_url),
        }
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Set the total number of attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.config = self.config.with_max_attempts(max_attempts);
        self
    }

    /// Set the backoff unit
    pub fn with_retry_base_delay(mut self, delay: std::time::Duration) -> Self {
        self.config = self.config.with_retry_base_delay(delay);
        self
    }

    /// Enable or disable request/response logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config = self.config.with_logging(enable);
        self
    }

    /// Build the client
    pub fn build(self) -> SdkResult<BoletinClient> {
        BoletinClient::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_builder() {
        let client = BoletinClient::builder("https://api.example.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_attempts(3)
            .with_logging(true)
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://api.example.com");
        assert_eq!(client.http_client().config().max_attempts, 3);
    }

    #[test]
    fn test_client_for_host() {
        let client = BoletinClient::for_host("127.0.0.1").unwrap();
        assert_eq!(client.base_url(), config::LOCAL_BASE_URL);
        assert_eq!(client.http_client().config().max_attempts, 2);
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let result = BoletinClient::builder("").build();
        assert!(matches!(result, Err(SdkError::ConfigurationError(_))));
    }

    #[test]
    fn test_client_update_configuration() {
        let mut client = BoletinClient::for_host("localhost").unwrap();
        client
            .update_configuration(EndpointConfig::resolve("app.vercel.app"))
            .unwrap();
        assert_eq!(client.base_url(), config::STAGING_BASE_URL);
    }
}
