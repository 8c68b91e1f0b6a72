//! # Client Configuration
//!
//! This module defines where the client finds the research service and how it
//! names models, and provides the logic for loading it from a `researchdesk.yml`
//! file and environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// The file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "researchdesk.yml";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The resolved client configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the research service. `RESEARCHDESK_BASE_URL`.
    pub base_url: String,
    /// Provider tag prepended to the selected model id. `RESEARCHDESK_LLM_PROVIDER`.
    pub llm_provider: String,
    /// Where the binary writes its log. `RESEARCHDESK_LOG_FILE`.
    pub log_file: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            llm_provider: "openai".to_string(),
            log_file: "researchdesk.log".to_string(),
        }
    }
}

// Reads a file and substitutes `${VAR}` references from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.into_owned()))
}

/// Loads the client configuration.
///
/// Layers, lowest priority first:
/// 1. Built-in defaults.
/// 2. A YAML file: `config_path_override` when given (it must exist), otherwise
///    `researchdesk.yml` in the working directory if present.
/// 3. `RESEARCHDESK_*` environment variables (e.g. `RESEARCHDESK_BASE_URL`).
pub fn get_config(config_path_override: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let defaults = ClientConfig::default();
    let mut builder = ConfigBuilder::builder()
        .set_default("base_url", defaults.base_url)?
        .set_default("llm_provider", defaults.llm_provider)?
        .set_default("log_file", defaults.log_file)?;

    let file_content = match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            Some(content)
        }
        None => {
            let content = read_and_substitute(DEFAULT_CONFIG_FILE)?;
            if content.is_some() {
                info!("Loading configuration from '{DEFAULT_CONFIG_FILE}'.");
            }
            content
        }
    };
    if let Some(content) = file_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("RESEARCHDESK")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
