//! Client configuration and the layered resolver
//!
//! Settings can come from command-line flags, environment variables and a
//! config file. Each source is described as a [`ConfigLayer`] of optional
//! values; [`resolve`] merges them (flags > env > file > defaults) into one
//! immutable [`ClientConfig`].

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::http::retry::RetryPolicy;

/// Hosted Outline API endpoint
pub const DEFAULT_API_URL: &str = "https://app.getoutline.com/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

pub const ENV_API_KEY: &str = "OUTLINE_API_KEY";
pub const ENV_API_URL: &str = "OUTLINE_API_URL";
/// Per-attempt timeout in milliseconds
pub const ENV_TIMEOUT: &str = "OUTLINE_TIMEOUT";
pub const ENV_RETRY_ATTEMPTS: &str = "OUTLINE_RETRY_ATTEMPTS";

/// Immutable settings for one client
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    /// Base URL without a trailing slash
    pub api_url: String,
    /// Bound on each individual attempt
    pub timeout: Duration,
    /// Total attempts per call, including the first
    pub retry_attempts: u32,
    /// Delay before the first retry
    pub retry_delay: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = normalize_url(api_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = retry_attempts;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Check the configuration before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::configuration("API key is required"));
        }

        Url::parse(&self.api_url).map_err(|e| Error::Configuration {
            message: format!("Invalid API URL '{}'", self.api_url),
            source: Some(e.into()),
        })?;

        if self.retry_attempts == 0 {
            return Err(Error::configuration("retry attempts must be at least 1"));
        }
        if self.timeout.is_zero() {
            return Err(Error::configuration("timeout must be greater than zero"));
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, self.retry_delay)
    }
}

// Keeps the key out of debug logs
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

pub(crate) fn normalize_url(url: String) -> String {
    match url.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => url,
    }
}

/// One source of partial settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub timeout: Option<Duration>,
    pub retry_attempts: Option<u32>,
    pub retry_delay: Option<Duration>,
}

impl ConfigLayer {
    /// Read the `OUTLINE_*` variables from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read the `OUTLINE_*` variables through a lookup function.
    ///
    /// Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let timeout = match get(ENV_TIMEOUT) {
            Some(raw) => Some(Duration::from_millis(parse_number(ENV_TIMEOUT, &raw)?)),
            None => None,
        };
        let retry_attempts = match get(ENV_RETRY_ATTEMPTS) {
            Some(raw) => Some(parse_number(ENV_RETRY_ATTEMPTS, &raw)?),
            None => None,
        };

        Ok(Self {
            api_key: get(ENV_API_KEY),
            api_url: get(ENV_API_URL),
            timeout,
            retry_attempts,
            retry_delay: None,
        })
    }

    /// Fill every unset field of `self` from `lower`
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            api_key: self.api_key.or(lower.api_key),
            api_url: self.api_url.or(lower.api_url),
            timeout: self.timeout.or(lower.timeout),
            retry_attempts: self.retry_attempts.or(lower.retry_attempts),
            retry_delay: self.retry_delay.or(lower.retry_delay),
        }
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim().parse::<T>().map_err(|e| Error::Configuration {
        message: format!("{} must be a non-negative integer, got '{}'", name, raw),
        source: Some(e.into()),
    })
}

/// Merge the layers (flags > env > file > defaults) into a validated config
pub fn resolve(
    flags: Option<ConfigLayer>,
    env: Option<ConfigLayer>,
    file: Option<ConfigLayer>,
) -> Result<ClientConfig> {
    let merged = [flags, env, file]
        .into_iter()
        .flatten()
        .fold(ConfigLayer::default(), ConfigLayer::or);

    let api_key = merged.api_key.ok_or_else(|| {
        Error::configuration(format!(
            "API key is required. Pass --api-key, set {} or add it to the config file",
            ENV_API_KEY
        ))
    })?;

    let mut config = ClientConfig::new(api_key);
    if let Some(api_url) = merged.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(timeout) = merged.timeout {
        config = config.with_timeout(timeout);
    }
    if let Some(retry_attempts) = merged.retry_attempts {
        config = config.with_retry_attempts(retry_attempts);
    }
    if let Some(retry_delay) = merged.retry_delay {
        config = config.with_retry_delay(retry_delay);
    }

    config.validate()?;
    Ok(config)
}
