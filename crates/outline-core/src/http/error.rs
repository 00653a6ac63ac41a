//! HTTP error classification
//!
//! Turns a failed API response (status plus optional `{error, message, data}`
//! body) into one immutable [`ApiError`]. Category predicates are pure
//! functions of the status code.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Classification of API errors for retry logic and caller branching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// 400 - caller-supplied data is malformed
    Validation,
    /// 401/403 - credential invalid or insufficient
    Auth,
    /// 404
    NotFound,
    /// 429 - retried with backoff
    RateLimited,
    /// 5xx - retried with backoff
    ServerError,
    /// Any other non-success status
    Other,
}

impl ErrorCategory {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorCategory::Validation,
            401 | 403 => ErrorCategory::Auth,
            404 => ErrorCategory::NotFound,
            429 => ErrorCategory::RateLimited,
            s if s >= 500 => ErrorCategory::ServerError,
            _ => ErrorCategory::Other,
        }
    }

    /// Check if this error type should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::ServerError | ErrorCategory::RateLimited)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Auth => "auth",
            ErrorCategory::NotFound => "not found",
            ErrorCategory::RateLimited => "rate limited",
            ErrorCategory::ServerError => "server error",
            ErrorCategory::Other => "other",
        };
        f.write_str(name)
    }
}

/// Error payload returned by the API alongside a non-success status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error identifier, e.g. `validation_error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Additional structured details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiErrorBody {
    /// Extract an error body from an arbitrary JSON value.
    ///
    /// Non-object values and objects with unexpected field types yield
    /// `None` rather than failing; the status alone still classifies the error.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// A classified API failure.
///
/// This is the error surfaced for every response the server answered with a
/// non-success status. It is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub message: String,
    /// HTTP status code
    pub status: u16,
    /// Machine-readable error code from the response body
    pub code: Option<String>,
    /// Structured details from the response body, preserved as-is
    pub data: Option<Value>,
}

impl ApiError {
    /// Construct directly from a message and status, without a response body
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
            code: None,
            data: None,
        }
    }

    /// Create from a response status and optional error body
    pub fn from_response(status: u16, body: Option<&ApiErrorBody>) -> Self {
        let message = body
            .and_then(|b| non_empty(&b.message).or_else(|| non_empty(&b.error)))
            .unwrap_or_else(|| format!("API request failed with status {}", status));

        Self {
            message,
            status,
            code: body.and_then(|b| b.error.clone()),
            data: body.and_then(|b| b.data.clone()),
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_status(self.status)
    }

    /// Check if this error should trigger a retry
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    pub fn is_rate_limit_error(&self) -> bool {
        self.status == 429
    }

    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    pub fn is_not_found_error(&self) -> bool {
        self.status == 404
    }

    pub fn is_validation_error(&self) -> bool {
        self.status == 400
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}
