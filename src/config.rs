//! Extractor configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Environment variables override file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::DEFAULT_MAX_CHARS;
use crate::scrapers::{BrowserEngineConfig, ACCEPT_LANGUAGE, USER_AGENT};
use crate::structured::DEFAULT_MIN_DESCRIPTION_CHARS;

/// Lightweight fetch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// User agent for both stages. "impersonate" picks a random Chrome UA.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn default_accept_language() -> String {
    ACCEPT_LANGUAGE.to_string()
}

/// Output document limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Hard cap on the canonical document, in characters.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Structured data needs a description longer than this to be used.
    #[serde(default = "default_min_description_chars")]
    pub min_description_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            min_description_chars: default_min_description_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_min_description_chars() -> usize {
    DEFAULT_MIN_DESCRIPTION_CHARS
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub browser: BrowserEngineConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl ExtractorConfig {
    /// Load from `path` when given, defaults otherwise, then apply env overrides.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_path(path).await?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Parse a config file. `.json` is read as JSON, anything else as TOML.
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let config = match ext {
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config {}", path.display()))?,
            _ => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config {}", path.display()))?,
        };
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `JOBTEXT_FETCH_TIMEOUT`: lightweight fetch timeout in seconds
    /// - `JOBTEXT_MAX_SESSIONS`: concurrent render cap
    /// - `CHROME_PATH`: Chrome/Chromium executable
    /// - `BROWSER_HEADLESS`: "false" or "0" to show the browser window
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("JOBTEXT_FETCH_TIMEOUT") {
            match val.trim().parse() {
                Ok(secs) => self.fetch.timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid JOBTEXT_FETCH_TIMEOUT={:?}", val),
            }
        }

        if let Some(val) = lookup("JOBTEXT_MAX_SESSIONS") {
            match val.trim().parse() {
                Ok(n) => self.browser.max_sessions = n,
                Err(_) => warn!("Ignoring invalid JOBTEXT_MAX_SESSIONS={:?}", val),
            }
        }

        if let Some(val) = lookup("CHROME_PATH").filter(|v| !v.trim().is_empty()) {
            self.browser.chrome_path = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup("BROWSER_HEADLESS") {
            self.browser.headless = !(val.eq_ignore_ascii_case("false") || val == "0");
        }

        self
    }
}
