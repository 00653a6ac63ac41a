//! Per-attempt timeout enforcement
//!
//! The timeout wraps the whole transport call, so custom transports are
//! bounded the same way as the default one.

use std::future::Future;
use std::time::Duration;

use crate::http::transport::{TransportError, TransportErrorKind, TransportResponse};

/// Run one transport call, converting expiry into a retryable transport error
pub async fn with_timeout<F>(future: F, timeout: Duration) -> Result<TransportResponse, TransportError>
where
    F: Future<Output = Result<TransportResponse, TransportError>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::new(
            TransportErrorKind::Timeout,
            format!("request timed out after {}ms", timeout.as_millis()),
        )),
    }
}
