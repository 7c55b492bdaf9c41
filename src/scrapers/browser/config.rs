//! Rendering session configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the headless rendering stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    /// Set to false to watch a render while debugging selectors.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Chrome/Chromium executable. Auto-discovered when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Budget for the network-idle navigation strategy, in seconds.
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// Budget for the DOM-ready fallback strategy, in seconds.
    #[serde(default = "default_fallback_timeout")]
    pub fallback_timeout_secs: u64,

    /// Fixed delay after the fallback strategy, in milliseconds.
    #[serde(default = "default_settle_millis")]
    pub settle_millis: u64,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Browser locale, also used for `--lang` and `navigator.languages`.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Maximum concurrent rendering sessions (each is a browser process).
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            chrome_args: Vec::new(),
            navigation_timeout_secs: default_navigation_timeout(),
            fallback_timeout_secs: default_fallback_timeout(),
            settle_millis: default_settle_millis(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            locale: default_locale(),
            max_sessions: default_max_sessions(),
        }
    }
}

pub fn default_headless() -> bool {
    true
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_fallback_timeout() -> u64 {
    20
}

fn default_settle_millis() -> u64 {
    3000
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    800
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_max_sessions() -> usize {
    2
}
