//! Configuration file management for the CLI
//!
//! The file lives at `~/.oln/config.json` unless `--config`/`OLN_CONFIG`
//! points elsewhere. It is JSON by default and YAML when the extension is
//! `.yaml` or `.yml`. The file is only the lowest layer: flags and
//! environment variables are merged over it by `outline_core::resolve`.

use crate::cli::ConfigKey;
use crate::error::{Error, Result};
use outline_core::ConfigLayer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Contents of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Outline API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Total attempts per request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_attempts: Option<u32>,

    /// Collection used by `docs create` when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_collection: Option<String>,

    /// Output format used when `--output` is left at its default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".oln").join("config.json"))
            .ok_or_else(|| Error::config("Could not determine the home directory"))
    }

    /// Path in effect for this invocation
    pub fn resolve_path(file: Option<&Path>) -> Result<PathBuf> {
        match file {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load the configuration file; a missing file yields the defaults
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(file)?;
        if file.is_some() && !path.exists() {
            return Err(Error::FileNotFound { path });
        }
        Self::load_or_default(&path)
    }

    /// Load `path` if it exists, otherwise return the defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(path = %path.display(), "Loading configuration file");
        Self::from_file(path).map_err(|e| {
            Error::config(format!("Failed to load {}: {}", path.display(), e))
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Delete the configuration file; returns whether one existed
    pub fn clear(path: &Path) -> Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Update one key
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::invalid_args("value must not be empty"));
        }

        match key {
            ConfigKey::ApiKey => self.api_key = Some(value.to_string()),
            ConfigKey::ApiUrl => {
                url::Url::parse(value)
                    .map_err(|e| Error::invalid_args(format!("invalid URL '{}': {}", value, e)))?;
                self.api_url = Some(value.to_string());
            }
            ConfigKey::DefaultCollection => self.default_collection = Some(value.to_string()),
            ConfigKey::Output => {
                if !matches!(value, "human" | "json" | "json-pretty" | "yaml") {
                    return Err(Error::invalid_args(format!(
                        "unknown output format '{}' (expected human, json, json-pretty or yaml)",
                        value
                    )));
                }
                self.output = Some(value.to_string());
            }
        }
        Ok(())
    }

    /// The file's contribution to client configuration
    pub fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            api_key: self.api_key.clone(),
            api_url: self.api_url.clone(),
            timeout: self.timeout_ms.map(Duration::from_millis),
            retry_attempts: self.retry_attempts,
            retry_delay: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_json_roundtrip_uses_camel_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            api_key: Some("ol_api_abc".to_string()),
            api_url: Some("https://wiki.example.com/api".to_string()),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["apiKey"], "ol_api_abc");
        assert_eq!(raw["apiUrl"], "https://wiki.example.com/api");
        assert!(raw.get("timeoutMs").is_none());

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_yaml_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oln.yaml");
        std::fs::write(&path, "apiKey: from-yaml\nretryAttempts: 5\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-yaml"));
        assert_eq!(config.retry_attempts, Some(5));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            Config::load_with_file(Some(&path)),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        Config::default().save(&path).unwrap();

        assert!(Config::clear(&path).unwrap());
        assert!(!Config::clear(&path).unwrap());
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        config.set(ConfigKey::ApiUrl, "https://wiki.example.com/api").unwrap();
        config.set(ConfigKey::Output, "yaml").unwrap();
        assert!(config.set(ConfigKey::ApiUrl, "not a url").is_err());
        assert!(config.set(ConfigKey::Output, "xml").is_err());
        assert!(config.set(ConfigKey::ApiKey, "  ").is_err());
        assert_eq!(config.output.as_deref(), Some("yaml"));
    }

    #[test]
    fn test_to_layer() {
        let config = Config {
            api_key: Some("k".to_string()),
            timeout_ms: Some(1500),
            ..Default::default()
        };
        let layer = config.to_layer();
        assert_eq!(layer.api_key.as_deref(), Some("k"));
        assert_eq!(layer.timeout, Some(Duration::from_millis(1500)));
        assert_eq!(layer.api_url, None);
    }
}
