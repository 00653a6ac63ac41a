//! Retry logic with exponential backoff for API requests
//!
//! The retry loop is an explicit state machine: after every attempt the
//! engine asks [`RetryPolicy::transition`] what happens next. The decision
//! depends only on the attempt number and the outcome, so it is tested here
//! without any network plumbing.

use std::time::Duration;

use crate::error::Result;

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for every retry after that
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Where the retry loop goes after an attempt finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// The attempt succeeded
    Success,
    /// The attempt failed with an error that must not be retried
    Terminal,
    /// The attempt failed with a retryable error but no attempts remain
    Exhausted,
    /// Sleep for `delay`, then run attempt `next_attempt`
    Retry { next_attempt: u32, delay: Duration },
}

impl RetryState {
    /// Whether the loop ends in this state
    pub fn is_final(&self) -> bool {
        !matches!(self, RetryState::Retry { .. })
    }
}

impl RetryPolicy {
    /// Create a new retry policy with custom settings
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay before retry number `retry` (1-indexed): `base * 2^(retry - 1)`
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Decide the next state after attempt `attempt` (1-indexed) produced `outcome`
    pub fn transition<T>(&self, attempt: u32, outcome: &Result<T>) -> RetryState {
        let error = match outcome {
            Ok(_) => return RetryState::Success,
            Err(error) => error,
        };

        if !error.is_retryable() {
            return RetryState::Terminal;
        }

        if attempt >= self.max_attempts {
            return RetryState::Exhausted;
        }

        RetryState::Retry {
            next_attempt: attempt + 1,
            delay: self.delay_for_retry(attempt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::error::ApiError;
    use crate::http::transport::{TransportError, TransportErrorKind};

    fn api_failure(status: u16) -> Result<()> {
        Err(Error::Api(ApiError::new("failure", status)))
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(100))
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_delays() {
        let policy = policy();
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_retry(4), Duration::from_millis(800));
    }

    #[test]
    fn test_success_short_circuits() {
        let outcome: Result<u32> = Ok(7);
        assert_eq!(policy().transition(1, &outcome), RetryState::Success);
        assert_eq!(policy().transition(3, &outcome), RetryState::Success);
    }

    #[test]
    fn test_server_errors_retry_until_exhausted() {
        let policy = policy();

        assert_eq!(
            policy.transition(1, &api_failure(500)),
            RetryState::Retry {
                next_attempt: 2,
                delay: Duration::from_millis(100)
            }
        );
        assert_eq!(
            policy.transition(2, &api_failure(503)),
            RetryState::Retry {
                next_attempt: 3,
                delay: Duration::from_millis(200)
            }
        );
        assert_eq!(policy.transition(3, &api_failure(500)), RetryState::Exhausted);
    }

    #[test]
    fn test_rate_limit_is_retried() {
        assert!(matches!(
            policy().transition(1, &api_failure(429)),
            RetryState::Retry { .. }
        ));
    }

    #[test]
    fn test_client_errors_are_terminal() {
        for status in [400, 401, 403, 404, 409, 422] {
            assert_eq!(
                policy().transition(1, &api_failure(status)),
                RetryState::Terminal,
                "status {}",
                status
            );
        }
    }

    #[test]
    fn test_transport_failures_are_retried() {
        for kind in [
            TransportErrorKind::Timeout,
            TransportErrorKind::Connect,
            TransportErrorKind::EmptyBody,
            TransportErrorKind::InvalidJson,
        ] {
            let outcome: Result<()> = Err(TransportError::new(kind, "down").into());
            assert!(matches!(
                policy().transition(1, &outcome),
                RetryState::Retry { next_attempt: 2, .. }
            ));
        }
    }

    #[test]
    fn test_malformed_payload_is_terminal() {
        let outcome: Result<()> =
            Err(TransportError::new(TransportErrorKind::MalformedPayload, "missing field").into());
        assert_eq!(policy().transition(1, &outcome), RetryState::Terminal);
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = RetryPolicy::new(1, Duration::from_millis(10));
        assert_eq!(policy.transition(1, &api_failure(500)), RetryState::Exhausted);
    }

    #[test]
    fn test_final_states() {
        assert!(RetryState::Success.is_final());
        assert!(RetryState::Terminal.is_final());
        assert!(RetryState::Exhausted.is_final());
        assert!(!RetryState::Retry {
            next_attempt: 2,
            delay: Duration::ZERO
        }
        .is_final());
    }
}
