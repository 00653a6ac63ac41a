//! Request engine shared by every resource facade
//!
//! Builds the wire request, runs it through the transport under a timeout,
//! turns the raw response into an envelope or a classified error, and drives
//! the retry state machine.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::config::{normalize_url, ClientConfig};
use crate::error::{Error, Result};
use crate::http::error::{ApiError, ApiErrorBody};
use crate::http::retry::{RetryPolicy, RetryState};
use crate::http::timeout::with_timeout;
use crate::http::transport::{
    Method, ReqwestTransport, Transport, TransportError, TransportErrorKind, TransportRequest,
    TransportResponse,
};
use crate::types::ApiResponse;

/// Per-call options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// HTTP method, POST unless overridden
    pub method: Method,
    /// JSON body; omitted from the wire when `None`
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize any payload into the request body
    pub fn json<B: Serialize>(body: &B) -> Result<Self> {
        Ok(Self::default().with_body(to_body(body)?))
    }
}

/// Serialize a payload, mapping failures into [`Error::Json`]
pub fn to_body<B: Serialize>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::Json {
        message: "failed to encode request body".to_string(),
        source: e,
    })
}

/// Serialize `payload` and merge `id` into its fields.
///
/// Non-object payloads (e.g. `null` from an empty options struct) are
/// replaced by a body containing only the id.
pub fn body_with_id<B: Serialize>(id: &str, payload: &B) -> Result<Value> {
    let mut body = Map::new();
    body.insert("id".to_string(), Value::String(id.to_string()));
    if let Value::Object(fields) = to_body(payload)? {
        for (key, value) in fields {
            if key != "id" {
                body.insert(key, value);
            }
        }
    }
    Ok(Value::Object(body))
}

/// Executes API calls with authentication, timeouts and retries
pub struct RequestEngine {
    config: ClientConfig,
    policy: RetryPolicy,
    transport: Arc<dyn Transport>,
}

impl RequestEngine {
    /// Create an engine over a custom transport; fails fast on invalid config
    pub fn new(mut config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.api_url = normalize_url(config.api_url);
        config.validate()?;
        let policy = config.retry_policy();
        Ok(Self {
            config,
            policy,
            transport,
        })
    }

    /// Create an engine over the default `reqwest` transport
    pub fn with_default_transport(config: ClientConfig) -> Result<Self> {
        Self::new(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Call `path` and decode the envelope's payload as `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>> {
        let request = self.build_request(path, &options)?;
        let mut attempt = 1;

        loop {
            debug!(
                method = %request.method,
                path,
                attempt,
                max_attempts = self.policy.max_attempts,
                "Sending request"
            );

            let outcome = self.attempt::<T>(request.clone()).await;

            match self.policy.transition(attempt, &outcome) {
                RetryState::Success => {
                    debug!(path, attempt, "Request succeeded");
                    return outcome;
                }
                RetryState::Terminal => {
                    if let Err(err) = &outcome {
                        debug!(path, attempt, error = %err, "Request failed with non-retryable error");
                    }
                    return outcome;
                }
                RetryState::Exhausted => {
                    if let Err(err) = &outcome {
                        error!(path, attempts = attempt, error = %err, "Request failed after all retry attempts");
                    }
                    return outcome;
                }
                RetryState::Retry { next_attempt, delay } => {
                    if let Err(err) = &outcome {
                        warn!(
                            path,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "Request failed, retrying"
                        );
                    }
                    tokio::time::sleep(delay).await;
                    attempt = next_attempt;
                }
            }
        }
    }

    fn build_request(&self, path: &str, options: &RequestOptions) -> Result<TransportRequest> {
        let body = options
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| Error::Json {
                message: format!("failed to encode request body for {}", path),
                source: e,
            })?;

        Ok(TransportRequest {
            method: options.method,
            url: format!("{}{}", self.config.api_url, path),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.api_key),
                ),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    async fn attempt<T: DeserializeOwned>(&self, request: TransportRequest) -> Result<ApiResponse<T>> {
        let response = with_timeout(self.transport.send(request), self.config.timeout).await?;
        parse_response(response)
    }
}

impl std::fmt::Debug for RequestEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEngine")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Turn one raw response into an envelope or an error
fn parse_response<T: DeserializeOwned>(response: TransportResponse) -> Result<ApiResponse<T>> {
    if response.body.trim().is_empty() {
        return Err(TransportError::new(
            TransportErrorKind::EmptyBody,
            format!("empty response body (status {})", response.status),
        )
        .into());
    }

    let value: Value = serde_json::from_str(&response.body).map_err(|e| {
        TransportError::new(
            TransportErrorKind::InvalidJson,
            format!("invalid JSON response: {}: {}", e, preview(&response.body)),
        )
    })?;

    if !response.is_success() {
        let body = ApiErrorBody::from_value(&value);
        return Err(ApiError::from_response(response.status, body.as_ref()).into());
    }

    // A 2xx carrying `ok: false` is still a failure reported by the server
    if value.get("ok").and_then(Value::as_bool) == Some(false) {
        let body = ApiErrorBody::from_value(&value);
        return Err(ApiError::from_response(response.status, body.as_ref()).into());
    }

    let mut envelope: ApiResponse<T> = serde_json::from_value(value).map_err(|e| {
        TransportError::new(
            TransportErrorKind::MalformedPayload,
            format!("unexpected response shape: {}", e),
        )
    })?;
    envelope.status = response.status;
    Ok(envelope)
}

fn preview(body: &str) -> String {
    body.chars().take(100).collect()
}
