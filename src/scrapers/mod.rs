//! Page acquisition: the lightweight HTTP fetch and the headless render.

pub mod browser;
mod http_client;

pub use browser::{BrowserEngineConfig, ChromeRenderer, PageRenderer, PageSession};
pub use http_client::{resolve_user_agent, HttpFetcher, PageFetcher, ACCEPT_LANGUAGE, USER_AGENT};
