//! Health resource client

use crate::client::{CallResult, HttpClient};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Path of the health operation
pub const HEALTH_PATH: &str = "/health";

/// Client for the service health check
#[derive(Debug, Clone, Copy)]
pub struct HealthClient<'a> {
    client: &'a HttpClient,
}

impl<'a> HealthClient<'a> {
    /// Create a new health client
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Ask the service for its health status
    pub async fn check(&self) -> CallResult<HealthStatus> {
        self.client.get(HEALTH_PATH).await
    }
}

/// Health report returned by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Reported status, such as `ok` or `healthy`
    #[serde(default)]
    pub status: Option<String>,
    /// Optional human readable note
    #[serde(default)]
    pub message: Option<String>,
    /// Any other field the service reports
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthStatus {
    /// Whether the reported status reads as healthy
    pub fn is_healthy(&self) -> bool {
        matches!(
            self.status.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("ok" | "healthy" | "up")
        )
    }
}
