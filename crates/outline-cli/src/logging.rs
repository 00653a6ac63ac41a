//! Logging setup for the oln CLI
//!
//! This module provides:
//! - Subscriber installation from verbosity and environment
//! - A per-invocation request id
//! - Redaction of credentials before anything is echoed
//! - Timing spans around commands

use crate::error::{Error, Result};
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Request ID for the current invocation
static REQUEST_ID: OnceLock<String> = OnceLock::new();

/// Crates whose debug output drowns the CLI's own events
const NOISY_CRATES: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2"];

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Colorize stderr output
    pub console: bool,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Apply `RUST_LOG` and `OLN_LOG_FORMAT`
    pub fn merge_with_env(&mut self) {
        self.merge_with_vars(|name| std::env::var(name).ok());
    }

    fn merge_with_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rust_log) = lookup("RUST_LOG") {
            self.level = rust_log;
        }

        if let Some(format) = lookup("OLN_LOG_FORMAT") {
            match format.to_lowercase().as_str() {
                "compact" => self.format = LogFormat::Compact,
                "full" => self.format = LogFormat::Full,
                "json" => self.format = LogFormat::Json,
                _ => eprintln!("Invalid OLN_LOG_FORMAT '{}', using default", format),
            }
        }
    }
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config)?;
    let ansi = config.console && std::io::stderr().is_terminal();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(config.thread_ids)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    // Each format produces a different subscriber type
    let installed = match config.format {
        LogFormat::Compact => {
            tracing::subscriber::set_global_default(builder.with_ansi(ansi).compact().finish())
        }
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.with_ansi(false).json().finish())
        }
        LogFormat::Full => tracing::subscriber::set_global_default(builder.with_ansi(ansi).finish()),
    };
    installed.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let request_id = generate_request_id();
    REQUEST_ID.set(request_id.clone()).map_err(|_| {
        Error::other("Failed to set request ID - request tracking may not work correctly")
    })?;

    tracing::debug!(
        request_id = %request_id,
        config = ?config,
        "Logging system initialized"
    );

    Ok(())
}

/// Create environment filter based on configuration
fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    // Only pin the HTTP stack down when the user did not ask for it explicitly
    if !config.level.contains('=') {
        for module in NOISY_CRATES {
            filter = filter.add_directive(
                format!("{}=warn", module)
                    .parse()
                    .map_err(|e| Error::other(format!("Invalid filter directive: {}", e)))?,
            );
        }
    }

    Ok(filter)
}

/// Generate a unique request ID for this invocation
pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

/// Get the current request ID
pub fn current_request_id() -> Option<&'static str> {
    REQUEST_ID.get().map(|s| s.as_str())
}

/// Create a span with request ID and timing
pub fn create_operation_span(operation: &str) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        request_id = current_request_id().unwrap_or("unknown"),
        duration_ms = field::Empty,
    )
}

/// Sensitive data redaction utilities
pub mod redaction {
    use regex::Regex;
    use std::sync::OnceLock;

    static BEARER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    static OUTLINE_KEY_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    static API_KEY_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

    fn patterns() -> [(&'static OnceLock<Option<Regex>>, &'static str, &'static str); 3] {
        [
            (&BEARER_REGEX, r"(?i)(bearer)\s+[A-Za-z0-9_.\-]+", "$1 ***"),
            (&OUTLINE_KEY_REGEX, r"ol_api_[A-Za-z0-9]+", "ol_api_***"),
            (
                &API_KEY_REGEX,
                r#"(?i)(api[_-]?key)(["']?\s*[=:]\s*["']?)[A-Za-z0-9_\-]{6,}"#,
                "$1$2***",
            ),
        ]
    }

    /// Redact credentials from a string
    pub fn redact_sensitive(input: &str) -> String {
        let mut result = input.to_string();
        for (cell, pattern, replacement) in patterns() {
            if let Some(regex) = cell.get_or_init(|| Regex::new(pattern).ok()) {
                result = regex.replace_all(&result, replacement).into_owned();
            }
        }
        result
    }

    /// Redact credentials from JSON values
    pub fn redact_json_value(value: &mut serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *val = serde_json::Value::String("***".to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            serde_json::Value::Array(arr) => {
                for item in arr.iter_mut() {
                    redact_json_value(item);
                }
            }
            serde_json::Value::String(s) => {
                *s = redact_sensitive(s);
            }
            _ => {}
        }
    }

    /// Mask all but the last four characters of a secret
    pub fn mask_secret(secret: &str) -> String {
        let count = secret.chars().count();
        if count <= 8 {
            return "*".repeat(count);
        }
        let tail: String = secret.chars().skip(count - 4).collect();
        format!("{}{}", "*".repeat(count - 4), tail)
    }

    fn is_sensitive_key(key: &str) -> bool {
        let key_lower = key.to_lowercase().replace(['_', '-'], "");
        key_lower.contains("apikey")
            || key_lower.contains("token")
            || key_lower.contains("secret")
            || key_lower.contains("password")
            || key_lower == "authorization"
    }
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;
    use tracing::Span;

    /// A timer that logs its duration when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation),
                operation: operation.to_string(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_redaction() {
        let input = "Authorization: Bearer ol_api_abc123XYZ and api_key=ol_api_zzz999 apiKey: \"plainsecret\"";
        let redacted = redaction::redact_sensitive(input);
        assert!(!redacted.contains("abc123XYZ"));
        assert!(!redacted.contains("zzz999"));
        assert!(!redacted.contains("plainsecret"));
        assert!(redacted.contains("Bearer ***"));
    }

    #[test]
    fn test_json_redaction() {
        let mut value = serde_json::json!({
            "apiKey": "ol_api_1234567890",
            "apiUrl": "https://app.getoutline.com/api",
            "headers": {
                "Authorization": "Bearer token123"
            },
            "keys": [{ "name": "ci", "secret": "s3cr3t" }]
        });

        redaction::redact_json_value(&mut value);

        assert_eq!(value["apiKey"], "***");
        assert_eq!(value["apiUrl"], "https://app.getoutline.com/api");
        assert_eq!(value["headers"]["Authorization"], "***");
        assert_eq!(value["keys"][0]["secret"], "***");
        assert_eq!(value["keys"][0]["name"], "ci");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(redaction::mask_secret("ol_api_abcdefgh"), "***********efgh");
        assert_eq!(redaction::mask_secret("short"), "*****");
    }

    #[test]
    fn test_logging_config_from_verbosity() {
        let config = LoggingConfig::from_verbosity(0);
        assert_eq!(config.level, "warn");
        assert!(!config.source_location);

        let config = LoggingConfig::from_verbosity(2);
        assert_eq!(config.level, "debug");
        assert!(config.source_location);

        let config = LoggingConfig::from_verbosity(3);
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.thread_ids);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> =
            [("RUST_LOG", "outline_core=debug"), ("OLN_LOG_FORMAT", "JSON")].into_iter().collect();

        let mut config = LoggingConfig::default();
        config.merge_with_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.level, "outline_core=debug");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_env_filter_accepts_directives() {
        let config = LoggingConfig {
            level: "outline_core=trace,warn".to_string(),
            ..Default::default()
        };
        assert!(create_env_filter(&config).is_ok());
    }

    #[test]
    fn test_request_id_format() {
        let id = generate_request_id();
        assert!(id.starts_with("req_"));
        assert_eq!(id.len(), 4 + 32);
    }
}
