//! Advisor configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `OPENROUTER_API_KEY` - OpenRouter API key for completion calls
//!
//! ## Optional
//! - `OPENROUTER_MODEL` - Model ID (default: openai/gpt-3.5-turbo)
//! - `OPENROUTER_TIMEOUT_SECS` - Per-call request timeout in seconds
//!   (default: 30). Applies to every completion call, including the
//!   concurrent per-tool calls.
//! - `OPENROUTER_REFERER` - HTTP-Referer header value
//! - `OPENROUTER_TITLE` - X-Title header value

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFERER: &str = "https://bazarify.app";
const DEFAULT_TITLE: &str = "Bazarify SME Platform";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Advisor application configuration.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// OpenRouter API key (secret).
    pub api_key: SecretString,
    /// Completion model ID.
    pub model: String,
    /// Per-call request timeout.
    pub request_timeout: Duration,
    /// HTTP-Referer header sent with every request.
    pub referer: String,
    /// X-Title header sent with every request.
    pub title: String,
}

impl AdvisorConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_env("OPENROUTER_API_KEY")?;

        let model = optional_env("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout_secs = match optional_env("OPENROUTER_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("OPENROUTER_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let referer =
            optional_env("OPENROUTER_REFERER").unwrap_or_else(|| DEFAULT_REFERER.to_string());
        let title = optional_env("OPENROUTER_TITLE").unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Ok(Self {
            api_key: SecretString::from(api_key),
            model,
            request_timeout: Duration::from_secs(timeout_secs),
            referer,
            title,
        })
    }
}

/// Get a required environment variable.
fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
