//! Error types for the Outline core library
//!
//! Every call through the request engine either yields a successful
//! envelope or one of these errors. Remote failures carry a classified
//! [`ApiError`]; failures below the HTTP layer carry a [`TransportError`]
//! and never pretend to have a status code or machine error code.

use thiserror::Error;

use crate::http::error::{ApiError, ErrorCategory};
use crate::http::transport::{TransportError, TransportErrorKind};

/// Main error type for Outline client operations
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a non-success status
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Timeout, connection failure, or an unreadable response body
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid or missing client configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A request payload could not be encoded as JSON
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// The classified API error, if the server produced one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of the failed call, when one was received
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|err| err.status)
    }

    /// Category of the failure; transport failures have their own bucket
    pub fn category(&self) -> Option<ErrorCategory> {
        self.api_error().map(ApiError::category)
    }

    /// Whether the request engine may attempt the call again
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(err) => err.is_retryable(),
            // The server answered successfully; resending could repeat its side effects
            Self::Transport(err) => err.kind != TransportErrorKind::MalformedPayload,
            Self::Configuration { .. } | Self::Json { .. } => false,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_auth_error)
    }

    pub fn is_not_found_error(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_not_found_error)
    }

    pub fn is_validation_error(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_validation_error)
    }

    pub fn is_rate_limit_error(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_rate_limit_error)
    }

    pub fn is_server_error(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_server_error)
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
