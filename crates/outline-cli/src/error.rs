//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the Outline client library
    #[error("{0}")]
    Core(#[from] outline_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(core) if core.is_auth_error() => 3,
            Self::Core(core) if core.is_not_found_error() => 4,
            Self::Core(core) if core.is_transport_error() => 5,
            Self::Core(outline_core::Error::Configuration { .. }) => 6,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 7,
            Self::Config(_) => 6,
            Self::InvalidArgs(_) => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }

    /// A follow-up suggestion for the user, if one applies
    pub fn hint(&self) -> Option<&'static str> {
        let core = match self {
            Self::Core(core) => core,
            Self::Config(_) => return Some("Run 'oln config show' to inspect the active settings"),
            _ => return None,
        };

        if core.is_auth_error() {
            Some("Check your API key: pass --api-key, set OUTLINE_API_KEY or run 'oln config set api-key <KEY>'")
        } else if core.is_not_found_error() {
            Some("Check the id; url ids and full ids are both accepted")
        } else if core.is_rate_limit_error() || core.is_server_error() {
            Some("The server is busy or failing; try again later")
        } else if core.is_transport_error() {
            Some("Could not reach the server; check --api-url and your network connection")
        } else if matches!(core, outline_core::Error::Configuration { .. }) {
            Some("Run 'oln config show' to inspect the active settings")
        } else {
            None
        }
    }
}

/// Extension trait for displaying errors with context
pub trait ErrorContext<T> {
    /// Add context with a closure (only evaluated on error)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other {
                message: format!("{}: {}", f(), inner),
            }
        })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    use colored::Colorize;

    let mut message = if use_color {
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    };

    if let Error::Core(core) = error {
        if let Some(api) = core.api_error() {
            let detail = match &api.code {
                Some(code) => format!("(status {}, {})", api.status, code),
                None => format!("(status {})", api.status),
            };
            message.push(' ');
            message.push_str(&if use_color { detail.dimmed().to_string() } else { detail });
        }
    }

    if let Some(hint) = error.hint() {
        message.push('\n');
        message.push_str(&if use_color {
            format!("{} {}", "Hint:".yellow(), hint)
        } else {
            format!("Hint: {}", hint)
        });
    }

    message
}
