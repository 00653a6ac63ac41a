//! Shared utilities for command handlers

use crate::config::Config;
use crate::error::{Error, ErrorContext, Result};
use crate::output::OutputWriter;
use outline_core::{ApiResponse, ClientConfig, ConfigLayer, OutlineClient};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings gathered before dispatch.
///
/// The client is only built by commands that talk to the API, so `config`
/// and `completions` keep working without an API key.
#[derive(Debug, Clone)]
pub struct Session {
    /// Parsed configuration file (defaults when absent)
    pub file: Config,
    /// Where the configuration file lives
    pub path: PathBuf,
    /// `--api-key` / `--api-url`
    pub flags: ConfigLayer,
}

impl Session {
    pub fn new(file: Config, path: PathBuf, flags: ConfigLayer) -> Self {
        Self { file, path, flags }
    }

    /// Resolve client settings as flags > environment > file > defaults
    pub fn client_config(&self) -> Result<ClientConfig> {
        self.client_config_with(ConfigLayer::from_env()?)
    }

    pub fn client_config_with(&self, env: ConfigLayer) -> Result<ClientConfig> {
        Ok(outline_core::resolve(
            Some(self.flags.clone()),
            Some(env),
            Some(self.file.to_layer()),
        )?)
    }

    /// Build an API client from the resolved settings
    pub fn client(&self) -> Result<OutlineClient> {
        let config = self.client_config()?;
        debug!(config = ?config, "Resolved client configuration");
        Ok(OutlineClient::new(config)?)
    }
}

/// Take the payload out of a response envelope
pub fn payload<T>(response: ApiResponse<T>, operation: &str) -> Result<T> {
    response
        .into_data()
        .ok_or_else(|| Error::other(format!("{} returned no data", operation)))
}

/// Document body from `--text` or `--file`
pub fn read_body(text: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    match (text, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => {
            if !path.exists() {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(Some(content))
        }
        (None, None) => Ok(None),
    }
}

/// Await `future` behind a spinner when the terminal allows it
pub async fn with_spinner<F, T>(output: &OutputWriter, message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = output.spinner(message);
    let result = future.await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    result
}
