//! HTTP plumbing for Outline API calls
//!
//! This module provides:
//! - A pluggable transport capability with a `reqwest` default
//! - Error classification of non-success responses
//! - Retry as an explicit state machine with exponential backoff
//! - Per-attempt timeouts
//! - The request engine tying them together

pub mod client;
pub mod error;
pub mod retry;
pub mod timeout;
pub mod transport;

pub use client::{body_with_id, to_body, RequestEngine, RequestOptions};
pub use error::{ApiError, ApiErrorBody, ErrorCategory};
pub use retry::{RetryPolicy, RetryState};
pub use timeout::with_timeout;
pub use transport::{
    Method, ReqwestTransport, Transport, TransportError, TransportErrorKind, TransportRequest,
    TransportResponse,
};
