//! HTTP client implementation
//!
//! This module provides the request engine: every call runs a bounded
//! attempt loop where each attempt is raced against the configured timeout,
//! failures are classified, and retryable ones are retried after a linear
//! backoff. A call always resolves to exactly one success value or one
//! [`ClassifiedError`].

use crate::config::EndpointConfig;
use crate::error::{ClassifiedError, SdkResult};
use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Result type for engine calls
pub type CallResult<T> = Result<T, ClassifiedError>;

/// The HTTP client for making API requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: EndpointConfig,
}

/// How a 2xx body is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    /// The body must be a `{success, data}` envelope
    Enveloped,
    /// Envelopes are unwrapped; any other JSON body passes through whole
    Lenient,
}

/// Response envelope used by the analysis service
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: EndpointConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        // No client-wide timeout: each attempt is bounded in `attempt`.
        let client = Client::builder()
            .user_agent(concat!("boletin-sdk/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Replace the configuration used by subsequent calls.
    ///
    /// Takes `&mut self`, so it cannot run while a call borrowed from this
    /// client is in flight. An invalid configuration is rejected and the
    /// current one kept.
    pub fn update_configuration(&mut self, config: EndpointConfig) -> SdkResult<()> {
        config.validate()?;
        info!(
            base_url = %config.base_url,
            timeout_ms = config.request_timeout.as_millis() as u64,
            max_attempts = config.max_attempts,
            "Endpoint configuration updated"
        );
        self.config = config;
        Ok(())
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Make a GET request and decode the payload
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> CallResult<T> {
        let payload = self.execute::<()>(path, Method::GET, None).await?;
        decode(payload)
    }

    /// Make a POST request and decode the payload
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> CallResult<T> {
        let payload = self.execute(path, Method::POST, Some(body)).await?;
        decode(payload)
    }

    /// Make a POST request whose reply must be an envelope, and decode its data
    pub async fn post_enveloped<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> CallResult<T> {
        let payload = self.execute_enveloped(path, Method::POST, Some(body)).await?;
        decode(payload)
    }

    /// Execute one logical operation with bounded retries.
    ///
    /// Returns the envelope's `data` on success. Attempts run strictly one
    /// after another; the wait after failed attempt `k` is
    /// `retry_base_delay * k`. Client request errors end the loop at once.
    /// A 2xx JSON body without a `success` key is returned whole.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
    ) -> CallResult<Value> {
        self.run(path, method, body, Reply::Lenient).await
    }

    /// Like [`execute`](Self::execute), but a 2xx reply without a `success`
    /// flag is a `ClientRequestError` with code `API_ERROR`, never retried.
    pub async fn execute_enveloped<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
    ) -> CallResult<Value> {
        self.run(path, method, body, Reply::Enveloped).await
    }

    async fn run<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
        reply: Reply,
    ) -> CallResult<Value> {
        let url = self.url(path);
        let body_json = match body.map(serde_json::to_string).transpose() {
            Ok(json) => json,
            Err(e) => {
                return Err(ClassifiedError::malformed(
                    None,
                    format!("Request body could not be serialized: {}", e),
                ))
            }
        };

        let max_attempts = self.config.max_attempts;
        let mut attempt = 1;

        loop {
            match self.attempt(&method, &url, body_json.as_deref(), reply).await {
                Ok(payload) => {
                    debug!(%method, %url, attempt, "Request succeeded");
                    return Ok(payload);
                }
                Err(error) => {
                    warn!(
                        %method,
                        %url,
                        attempt,
                        max_attempts,
                        kind = %error.kind(),
                        status = error.http_status(),
                        "Request attempt failed: {}",
                        error.message()
                    );

                    if attempt >= max_attempts || !error.is_retryable() {
                        return Err(error.with_attempts(attempt));
                    }

                    let backoff = self.config.backoff_delay(attempt);
                    info!(
                        "Retrying request (attempt {}/{}), waiting {:?}",
                        attempt + 1,
                        max_attempts,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Run a single attempt under the per-attempt timeout.
    ///
    /// When the timeout wins, the exchange future is dropped, which aborts
    /// the request and releases its connection; a late response is never seen.
    async fn attempt(
        &self,
        method: &Method,
        url: &str,
        body: Option<&str>,
        reply: Reply,
    ) -> CallResult<Value> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(body_str) = body {
            request = request.body(body_str.to_owned());
        }

        if self.config.enable_logging {
            debug!("Request: {} {}", method, url);
            if let Some(body_str) = body {
                debug!("Request body: {}", body_str);
            }
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        match tokio::time::timeout(self.config.request_timeout, exchange).await {
            Err(_elapsed) => Err(ClassifiedError::timeout(self.config.request_timeout)),
            Ok(Err(e)) => Err(ClassifiedError::from_transport(&e)),
            Ok(Ok((status, text))) => {
                if self.config.enable_logging {
                    debug!("Response {}: {}", status, text);
                }
                interpret(status, &text, reply)
            }
        }
    }
}

/// Turn a received response into the call outcome for this attempt
fn interpret(status: StatusCode, text: &str, reply: Reply) -> CallResult<Value> {
    if !status.is_success() {
        return Err(ClassifiedError::from_response(status, text));
    }

    if text.trim().is_empty() {
        return match reply {
            Reply::Lenient => Ok(Value::Null),
            Reply::Enveloped => Err(missing_envelope(status)),
        };
    }

    let value: Value = serde_json::from_str(text).map_err(|e| {
        ClassifiedError::malformed(Some(status), format!("Response is not valid JSON: {}", e))
    })?;

    // Bodies without an envelope (the health endpoint) pass through whole.
    let has_envelope = value.get("success").is_some();
    if !has_envelope {
        return match reply {
            Reply::Lenient => Ok(value),
            Reply::Enveloped => Err(missing_envelope(status)),
        };
    }

    let envelope: Envelope = serde_json::from_value(value).map_err(|e| {
        ClassifiedError::malformed(Some(status), format!("Malformed response envelope: {}", e))
    })?;

    if envelope.success {
        Ok(envelope.data.unwrap_or(Value::Null))
    } else {
        Err(ClassifiedError::rejected(status, envelope.message, envelope.code))
    }
}

fn missing_envelope(status: StatusCode) -> ClassifiedError {
    ClassifiedError::rejected(
        status,
        Some("Response carries no success flag".to_string()),
        None,
    )
}

/// Decode a successful payload. A mismatch is reported as `Unknown` with
/// zero attempts: the exchange itself succeeded and is not retried.
fn decode<T: DeserializeOwned>(payload: Value) -> CallResult<T> {
    serde_json::from_value(payload).map_err(|e| {
        ClassifiedError::malformed(None, format!("Unexpected response payload: {}", e))
    })
}
