//! Configuration command handlers

use super::utils::Session;
use crate::cli::{ConfigAction, ConfigArgs, ConfigSetArgs};
use crate::config::Config;
use crate::error::Result;
use crate::logging::redaction::mask_secret;
use crate::output::OutputWriter;
use clap::ValueEnum;
use outline_core::config::{ENV_API_KEY, ENV_API_URL, ENV_RETRY_ATTEMPTS, ENV_TIMEOUT};
use outline_core::{ConfigLayer, DEFAULT_API_URL};
use serde::Serialize;

/// Handle the config command
pub async fn handle_config(
    args: ConfigArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => handle_config_show(session, output),
        ConfigAction::Set(set_args) => handle_config_set(set_args, session, output),
        ConfigAction::Clear => handle_config_clear(session, output),
        ConfigAction::Path => output.writeln(&session.path.display().to_string()),
    }
}

/// Where an effective value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Source {
    Flag,
    Env,
    File,
    Default,
    Unset,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigReport {
    config_file: String,
    config_file_exists: bool,
    api_url: String,
    api_url_source: Source,
    api_key: Option<String>,
    api_key_source: Source,
    default_collection: Option<String>,
    output: Option<String>,
    environment: Vec<&'static str>,
    priority: &'static str,
}

fn pick(flag: &Option<String>, env: &Option<String>, file: &Option<String>) -> (Option<String>, Source) {
    [(flag, Source::Flag), (env, Source::Env), (file, Source::File)]
        .into_iter()
        .find_map(|(value, source)| value.clone().map(|v| (Some(v), source)))
        .unwrap_or((None, Source::Unset))
}

fn build_report(session: &Session, env: &ConfigLayer) -> ConfigReport {
    let file_layer = session.file.to_layer();

    let (api_url, api_url_source) = match pick(&session.flags.api_url, &env.api_url, &file_layer.api_url) {
        (Some(url), source) => (url, source),
        (None, _) => (DEFAULT_API_URL.to_string(), Source::Default),
    };
    let (api_key, api_key_source) = pick(&session.flags.api_key, &env.api_key, &file_layer.api_key);

    ConfigReport {
        config_file: session.path.display().to_string(),
        config_file_exists: session.path.exists(),
        api_url,
        api_url_source,
        api_key: api_key.map(|key| mask_secret(&key)),
        api_key_source,
        default_collection: session.file.default_collection.clone(),
        output: session.file.output.clone(),
        environment: vec![ENV_API_KEY, ENV_API_URL, ENV_TIMEOUT, ENV_RETRY_ATTEMPTS],
        priority: "flags > environment > config file > defaults",
    }
}

fn handle_config_show(session: &Session, output: &mut OutputWriter) -> Result<()> {
    let report = build_report(session, &ConfigLayer::from_env()?);

    if !output.is_human() {
        return output.data(&report);
    }

    let source = |s: Source| match s {
        Source::Flag => "flag",
        Source::Env => "environment",
        Source::File => "config file",
        Source::Default => "default",
        Source::Unset => "unset",
    };

    output.section("Configuration")?;
    output.writeln(&format!(
        "Config file:        {}{}",
        report.config_file,
        if report.config_file_exists { "" } else { " (not found)" }
    ))?;
    output.writeln(&format!(
        "API URL:            {} ({})",
        report.api_url,
        source(report.api_url_source)
    ))?;
    match &report.api_key {
        Some(key) => output.writeln(&format!(
            "API key:            {} ({})",
            key,
            source(report.api_key_source)
        ))?,
        None => output.warning("API key:            not set")?,
    }
    if let Some(collection) = &report.default_collection {
        output.writeln(&format!("Default collection: {}", collection))?;
    }
    if let Some(format) = &report.output {
        output.writeln(&format!("Output format:      {}", format))?;
    }

    output.section("Environment variables")?;
    for name in &report.environment {
        output.writeln(&format!("  {}", name))?;
    }
    output.writeln("")?;
    output.info(&format!("Priority: {}", report.priority))
}

fn handle_config_set(args: ConfigSetArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let mut config = Config::load_or_default(&session.path)?;
    config.set(args.key, &args.value)?;
    config.save(&session.path)?;

    tracing::info!(key = ?args.key, path = %session.path.display(), "Configuration updated");
    let name = args
        .key
        .to_possible_value()
        .map(|value| value.get_name().to_string())
        .unwrap_or_default();
    output.success(&format!("✓ Saved {} to {}", name, session.path.display()))
}

fn handle_config_clear(session: &Session, output: &mut OutputWriter) -> Result<()> {
    if Config::clear(&session.path)? {
        output.success(&format!("✓ Removed {}", session.path.display()))
    } else {
        output.info(&format!("No configuration file at {}", session.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn session(file: Config, flags: ConfigLayer) -> Session {
        Session::new(file, PathBuf::from("/nonexistent/oln/config.json"), flags)
    }

    #[test]
    fn test_report_sources() {
        let file = Config {
            api_key: Some("ol_api_fromfile1234".to_string()),
            default_collection: Some("col-1".to_string()),
            ..Default::default()
        };
        let env = ConfigLayer {
            api_url: Some("https://env.example.com/api".to_string()),
            ..Default::default()
        };

        let report = build_report(&session(file, ConfigLayer::default()), &env);
        assert_eq!(report.api_url, "https://env.example.com/api");
        assert_eq!(report.api_url_source, Source::Env);
        assert_eq!(report.api_key.as_deref(), Some("***************1234"));
        assert_eq!(report.api_key_source, Source::File);
        assert_eq!(report.default_collection.as_deref(), Some("col-1"));
        assert!(!report.config_file_exists);
    }

    #[test]
    fn test_report_defaults() {
        let flags = ConfigLayer {
            api_key: Some("flagkey".to_string()),
            ..Default::default()
        };
        let report = build_report(&session(Config::default(), flags), &ConfigLayer::default());
        assert_eq!(report.api_url, DEFAULT_API_URL);
        assert_eq!(report.api_url_source, Source::Default);
        assert_eq!(report.api_key_source, Source::Flag);
        assert_eq!(report.api_key.as_deref(), Some("*******"));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = build_report(&session(Config::default(), ConfigLayer::default()), &ConfigLayer::default());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["apiKeySource"], "unset");
        assert_eq!(value["environment"][0], "OUTLINE_API_KEY");
    }
}
