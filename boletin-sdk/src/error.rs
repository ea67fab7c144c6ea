//! SDK error types and failure classification
//!
//! Two error families live here. [`SdkError`] covers problems found while
//! building a client (bad base address, zero timeout). [`ClassifiedError`] is
//! the value every failed call resolves to: a closed [`ErrorKind`] tag plus
//! whatever the service told us about the failure.
//!
//! [`classify`] is the only place that decides which kind a raw failure
//! belongs to, and [`ErrorKind::is_retryable`] the only place that decides
//! whether that kind is worth another attempt.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while configuring the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// The underlying HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildError(#[from] reqwest::Error),
}

/// Result type alias for SDK construction
pub type SdkResult<T> = Result<T, SdkError>;

/// Closed set of failure kinds a call can end in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The per-attempt timeout fired before the exchange completed
    Timeout,
    /// The request never completed at the transport level
    NetworkUnavailable,
    /// The service rejected the request (4xx, or an envelope with `success: false`)
    ClientRequestError,
    /// The service failed internally (5xx)
    ServerError,
    /// Anything that fits none of the above
    Unknown,
}

impl ErrorKind {
    /// Whether a failure of this kind may succeed if attempted again.
    ///
    /// Client request errors are final: the same request will be rejected
    /// the same way until the caller changes it.
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::ClientRequestError)
    }

    /// Whether the failure happened before any response was received
    pub fn is_transport(self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::NetworkUnavailable)
    }

    /// Whether the service produced an error response
    pub fn is_http(self) -> bool {
        matches!(self, ErrorKind::ClientRequestError | ErrorKind::ServerError)
    }

    /// Message a front end shows the user for this kind of failure
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "The request took too long to complete",
            ErrorKind::NetworkUnavailable => "Could not reach the server",
            ErrorKind::ClientRequestError => "The server rejected the request",
            ErrorKind::ServerError => "The server failed internally",
            ErrorKind::Unknown => "Something went wrong while contacting the server",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::NetworkUnavailable => "network unavailable",
            ErrorKind::ClientRequestError => "client request error",
            ErrorKind::ServerError => "server error",
            ErrorKind::Unknown => "unknown error",
        };
        f.write_str(name)
    }
}

/// Raw failure signal observed during a single attempt
#[derive(Debug)]
pub enum FailureSignal<'a> {
    /// The per-attempt timeout aborted the exchange
    TimedOut,
    /// The transport reported an error before a full response was read
    Transport(&'a reqwest::Error),
    /// A response arrived with a non-success status
    Status(StatusCode),
    /// A success status whose body did not report success
    Rejected,
    /// A response arrived but its shape made no sense
    Malformed,
}

/// Map a raw failure signal to its [`ErrorKind`]
pub fn classify(signal: &FailureSignal<'_>) -> ErrorKind {
    match signal {
        FailureSignal::TimedOut => ErrorKind::Timeout,
        FailureSignal::Transport(err) if err.is_timeout() => ErrorKind::Timeout,
        FailureSignal::Transport(err) if err.is_decode() || err.is_builder() => ErrorKind::Unknown,
        FailureSignal::Transport(_) => ErrorKind::NetworkUnavailable,
        FailureSignal::Status(status) => match status.as_u16() {
            400..=499 => ErrorKind::ClientRequestError,
            500..=599 => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        },
        FailureSignal::Rejected => ErrorKind::ClientRequestError,
        FailureSignal::Malformed => ErrorKind::Unknown,
    }
}

/// A failed call, tagged with its [`ErrorKind`]
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{kind}: {message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    http_status: Option<u16>,
    message: String,
    code: Option<String>,
    details: Option<serde_json::Value>,
    attempts: u32,
}

/// Error body as the analysis service sends it.
///
/// The service nests the fields under `error` on its own failures, while
/// gateways in front of it answer with flat `message`/`code` objects.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<NestedErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct NestedErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

impl ClassifiedError {
    /// Create a classified error from its parts
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            http_status: None,
            message: message.into(),
            code: None,
            details: None,
            attempts: 0,
        }
    }

    /// The per-attempt timeout fired
    pub fn timeout(limit: Duration) -> Self {
        Self::new(
            classify(&FailureSignal::TimedOut),
            format!("Request timed out after {} ms", limit.as_millis()),
        )
        .with_code("TIMEOUT")
    }

    /// The transport failed before a response was read
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let kind = classify(&FailureSignal::Transport(err));
        let code = match kind {
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::NetworkUnavailable => "NETWORK_ERROR",
            _ => "UNKNOWN_ERROR",
        };
        Self::new(kind, err.to_string()).with_code(code)
    }

    /// A non-success response; the body is mined for `message`, `code` and
    /// `details`, falling back to the status line.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let nested = parsed.error.unwrap_or_default();

        let message = parsed
            .message
            .or(nested.message)
            .unwrap_or_else(|| status_line(status));
        let code = parsed
            .code
            .or(nested.code)
            .unwrap_or_else(|| format!("HTTP_{}", status.as_u16()));

        let mut error = Self::new(classify(&FailureSignal::Status(status)), message)
            .with_status(status.as_u16())
            .with_code(code);
        error.details = parsed.details.or(nested.details);
        error
    }

    /// A success status whose envelope reported `success: false`, or
    /// carried no envelope where one was required
    pub fn rejected(status: StatusCode, message: Option<String>, code: Option<String>) -> Self {
        Self::new(
            classify(&FailureSignal::Rejected),
            message.unwrap_or_else(|| "The analysis service reported a failure".to_string()),
        )
        .with_status(status.as_u16())
        .with_code(code.unwrap_or_else(|| "API_ERROR".to_string()))
    }

    /// A response that could not be interpreted
    pub fn malformed(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        let mut error =
            Self::new(classify(&FailureSignal::Malformed), message).with_code("UNKNOWN_ERROR");
        error.http_status = status.map(|s| s.as_u16());
        error
    }

    pub(crate) fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub(crate) fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub(crate) fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// The failure kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status of the failing response, if one was received
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Human readable description
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Service or synthesized error code
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Structured details sent by the service
    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }

    /// Number of attempts made before this error was surfaced
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {}: {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(400, ErrorKind::ClientRequestError)]
    #[case(404, ErrorKind::ClientRequestError)]
    #[case(429, ErrorKind::ClientRequestError)]
    #[case(499, ErrorKind::ClientRequestError)]
    #[case(500, ErrorKind::ServerError)]
    #[case(503, ErrorKind::ServerError)]
    #[case(599, ErrorKind::ServerError)]
    #[case(302, ErrorKind::Unknown)]
    #[case(101, ErrorKind::Unknown)]
    fn test_classify_status(#[case] status: u16, #[case] expected: ErrorKind) {
        let status = StatusCode::from_u16(status).unwrap();
        assert_eq!(classify(&FailureSignal::Status(status)), expected);
    }

    #[test]
    fn test_classify_signals() {
        assert_eq!(classify(&FailureSignal::TimedOut), ErrorKind::Timeout);
        assert_eq!(classify(&FailureSignal::Rejected), ErrorKind::ClientRequestError);
        assert_eq!(classify(&FailureSignal::Malformed), ErrorKind::Unknown);
    }

    #[rstest]
    #[case(ErrorKind::Timeout, true)]
    #[case(ErrorKind::NetworkUnavailable, true)]
    #[case(ErrorKind::ClientRequestError, false)]
    #[case(ErrorKind::ServerError, true)]
    #[case(ErrorKind::Unknown, true)]
    fn test_retryability(#[case] kind: ErrorKind, #[case] retryable: bool) {
        assert_eq!(kind.is_retryable(), retryable);
    }

    #[test]
    fn test_category_predicates() {
        assert!(ErrorKind::Timeout.is_transport());
        assert!(ErrorKind::NetworkUnavailable.is_transport());
        assert!(!ErrorKind::ServerError.is_transport());
        assert!(ErrorKind::ClientRequestError.is_http());
        assert!(ErrorKind::ServerError.is_http());
        assert!(!ErrorKind::Unknown.is_http());
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let kinds = [
            ErrorKind::Timeout,
            ErrorKind::NetworkUnavailable,
            ErrorKind::ClientRequestError,
            ErrorKind::ServerError,
            ErrorKind::Unknown,
        ];
        let mut messages: Vec<&str> = kinds.iter().map(|k| k.user_message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), kinds.len());
    }

    #[test]
    fn test_error_from_flat_body() {
        let body = r#"{"message": "fecha inválida", "code": "BAD_DATE"}"#;
        let error = ClassifiedError::from_response(StatusCode::BAD_REQUEST, body);

        assert_eq!(error.kind(), ErrorKind::ClientRequestError);
        assert_eq!(error.http_status(), Some(400));
        assert_eq!(error.message(), "fecha inválida");
        assert_eq!(error.code(), Some("BAD_DATE"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_error_from_nested_body() {
        let body = r#"{
            "success": false,
            "error": {"code": "LLM_001", "message": "Error en el servicio de análisis de IA", "details": "quota"},
            "message": "Error en el servicio de análisis de IA"
        }"#;
        let error = ClassifiedError::from_response(StatusCode::SERVICE_UNAVAILABLE, body);

        assert_eq!(error.kind(), ErrorKind::ServerError);
        assert_eq!(error.code(), Some("LLM_001"));
        assert_eq!(error.message(), "Error en el servicio de análisis de IA");
        assert_eq!(error.details(), Some(&serde_json::json!("quota")));
    }

    #[test]
    fn test_error_from_unparseable_body() {
        let error = ClassifiedError::from_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

        assert_eq!(error.kind(), ErrorKind::ServerError);
        assert_eq!(error.message(), "HTTP 502: Bad Gateway");
        assert_eq!(error.code(), Some("HTTP_502"));
        assert_eq!(error.details(), None);
    }

    #[test]
    fn test_timeout_error() {
        let error = ClassifiedError::timeout(Duration::from_secs(30));
        assert_eq!(error.kind(), ErrorKind::Timeout);
        assert_eq!(error.http_status(), None);
        assert_eq!(error.code(), Some("TIMEOUT"));
        assert_eq!(error.to_string(), "timeout: Request timed out after 30000 ms");
    }

    #[test]
    fn test_rejected_envelope_defaults() {
        let error = ClassifiedError::rejected(StatusCode::OK, None, None);
        assert_eq!(error.kind(), ErrorKind::ClientRequestError);
        assert_eq!(error.http_status(), Some(200));
        assert_eq!(error.code(), Some("API_ERROR"));
        assert_eq!(error.kind(), classify(&FailureSignal::Rejected));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_error_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::NetworkUnavailable).unwrap();
        assert_eq!(json, "\"network_unavailable\"");
    }
}
