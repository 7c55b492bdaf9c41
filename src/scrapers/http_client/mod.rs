//! Lightweight HTTP fetch stage.

mod user_agent;

pub use user_agent::{resolve_user_agent, ACCEPT_LANGUAGE, USER_AGENT};

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_HEADER};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::FetchConfig;

/// A single GET returning the response body as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// reqwest-backed fetcher with browser-like headers and a hard timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE_HEADER,
            HeaderValue::from_str(&config.accept_language)
                .context("Invalid Accept-Language header value")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );

        let client = Client::builder()
            .user_agent(resolve_user_agent(&config.user_agent))
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("GET {} returned an error status", url))?;

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read body from {}", url))?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_header() {
        let config = FetchConfig {
            accept_language: "en\nUS".to_string(),
            ..Default::default()
        };
        assert!(HttpFetcher::new(&config).is_err());
    }

    #[test]
    fn test_new_with_defaults() {
        assert!(HttpFetcher::new(&FetchConfig::default()).is_ok());
    }
}
