//! Pluggable transport capability
//!
//! The request engine never talks to a network library directly. It builds a
//! [`TransportRequest`] and hands it to a [`Transport`]; the default
//! implementation is [`ReqwestTransport`], tests substitute their own.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// HTTP method for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-assembled request, described as plain data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl TransportRequest {
    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The raw outcome of a request that reached the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Kinds of failure below the API layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The attempt exceeded the configured timeout
    Timeout,
    /// The connection could not be established
    Connect,
    /// The server answered with an empty body
    EmptyBody,
    /// The body was not valid JSON
    InvalidJson,
    /// The body was JSON but not the expected envelope shape
    MalformedPayload,
    /// Any other transport failure
    Other,
}

/// A failure with no structured API error body behind it.
///
/// Retryable by the request engine, except `MalformedPayload`: the server
/// already handled that call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transport error ({kind:?}): {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

/// Capability for sending one HTTP request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw status and body
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured reqwest client (proxies, TLS roots, ...)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn to_reqwest_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn map_error(error: reqwest::Error) -> TransportError {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        TransportError::new(kind, error.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(Self::map_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Self::map_error)?;

        Ok(TransportResponse { status, body })
    }
}
