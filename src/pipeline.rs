//! Staged extraction: resolve, fetch, JSON-LD, render, JSON-LD, selectors.
//!
//! Each stage either finishes the request or hands over to the next, more
//! expensive one. Only resolution errors, a failed render and an empty final
//! result reach the caller.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::ExtractorConfig;
use crate::document::assemble;
use crate::error::{ExtractionError, ExtractionResult};
use crate::platform::{resolve, Platform, ResolvedUrl};
use crate::platforms::{detect_block_signal, extractor_for};
use crate::scrapers::{resolve_user_agent, ChromeRenderer, HttpFetcher, PageFetcher, PageRenderer};
use crate::structured::StructuredPosting;

/// Result of one stage.
#[derive(Debug, PartialEq, Eq)]
enum StageOutcome {
    Done(String),
    Next,
}

/// Turns job listing URLs into canonical documents.
///
/// Holds no per-request state, so one instance can serve concurrent calls.
pub struct JobTextExtractor {
    config: ExtractorConfig,
    fetcher: Arc<dyn PageFetcher>,
    renderer: Arc<dyn PageRenderer>,
}

impl JobTextExtractor {
    /// Build with the reqwest fetcher and the Chrome renderer.
    pub fn new(config: ExtractorConfig) -> anyhow::Result<Self> {
        // Resolve once so both stages present the same user agent.
        let mut fetch = config.fetch.clone();
        fetch.user_agent = resolve_user_agent(&fetch.user_agent);

        let fetcher = HttpFetcher::new(&fetch)?;
        let renderer = ChromeRenderer::new(
            config.browser.clone(),
            fetch.user_agent,
            fetch.accept_language,
        );
        Ok(Self::with_components(config, Arc::new(fetcher), Arc::new(renderer)))
    }

    /// Build with caller-supplied page sources.
    pub fn with_components(
        config: ExtractorConfig,
        fetcher: Arc<dyn PageFetcher>,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        Self {
            config,
            fetcher,
            renderer,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the canonical job document for `raw_url`.
    pub async fn extract(&self, raw_url: &str) -> ExtractionResult<String> {
        let ResolvedUrl { platform, url } = resolve(raw_url)?;
        info!("Extracting {} job from {}", platform, url);

        if let StageOutcome::Done(text) = self.lightweight_stage(&url).await {
            return Ok(text);
        }

        let rendered = self.renderer.render(&url, platform).await.map_err(|e| {
            warn!("Render failed for {}: {:#}", url, e);
            ExtractionError::PageLoad {
                reason: format!("{:#}", e),
            }
        })?;

        if let StageOutcome::Done(text) = self.structured_stage(&rendered, "rendered") {
            return Ok(text);
        }

        self.selector_stage(platform, &url, &rendered)
    }

    /// Plain GET plus JSON-LD. Any fetch failure just moves on.
    async fn lightweight_stage(&self, url: &Url) -> StageOutcome {
        match self.fetcher.fetch(url).await {
            Ok(html) => self.structured_stage(&html, "fetched"),
            Err(e) => {
                warn!("Lightweight fetch failed for {}, rendering instead: {:#}", url, e);
                StageOutcome::Next
            }
        }
    }

    fn structured_stage(&self, html: &str, source: &str) -> StageOutcome {
        let Some(posting) = StructuredPosting::extract(html) else {
            debug!("No JobPosting JSON-LD in {} markup", source);
            return StageOutcome::Next;
        };

        if !posting.is_sufficient(self.config.output.min_description_chars) {
            debug!("JobPosting JSON-LD in {} markup is too thin", source);
            return StageOutcome::Next;
        }

        let text = assemble(&posting.to_fields(), self.config.output.max_chars);
        if text.trim().is_empty() {
            return StageOutcome::Next;
        }
        info!("Extracted job from {} JSON-LD", source);
        StageOutcome::Done(text)
    }

    fn selector_stage(&self, platform: Platform, url: &Url, html: &str) -> ExtractionResult<String> {
        let text = extractor_for(platform)
            .map(|extractor| extractor.extract_text(html, self.config.output.max_chars))
            .unwrap_or_default();

        if text.trim().is_empty() {
            let signal = detect_block_signal(html);
            warn!(
                "No job content found for {} (block signal: {:?})",
                url, signal
            );
            return Err(ExtractionError::EmptyExtraction { signal });
        }

        info!("Extracted job from {} selectors", platform);
        Ok(text)
    }
}

/// One-shot extraction with configuration from the environment.
pub async fn extract_job_text(url: &str) -> ExtractionResult<String> {
    let config = ExtractorConfig::default().with_env_overrides();
    let extractor = JobTextExtractor::new(config).map_err(|e| ExtractionError::PageLoad {
        reason: format!("{:#}", e),
    })?;
    extractor.extract(url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticFetcher(&'static str);

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &Url) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl PageRenderer for FailingRenderer {
        async fn render(&self, _url: &Url, _platform: Platform) -> anyhow::Result<String> {
            anyhow::bail!("net::ERR_NAME_NOT_RESOLVED")
        }
    }

    fn extractor(html: &'static str) -> JobTextExtractor {
        JobTextExtractor::with_components(
            ExtractorConfig::default(),
            Arc::new(StaticFetcher(html)),
            Arc::new(FailingRenderer),
        )
    }

    #[test]
    fn test_structured_stage_thin_posting_moves_on() {
        let html = r#"<script type="application/ld+json">{"@type":"JobPosting","title":"T","description":"short"}</script>"#;
        assert_eq!(extractor(html).structured_stage(html, "test"), StageOutcome::Next);
    }

    #[tokio::test]
    async fn test_render_failure_is_page_load() {
        let err = extractor("<html></html>")
            .extract("https://www.indeed.com/viewjob?jk=abc")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::PageLoad { ref reason } if reason.contains("ERR_NAME")));
    }

    #[test]
    fn test_selector_stage_reports_block_signal() {
        let url = Url::parse("https://www.linkedin.com/jobs/view/1/").unwrap();
        let err = extractor("")
            .selector_stage(Platform::LinkedIn, &url, "<div class=\"authwall\"></div>")
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::EmptyExtraction {
                signal: Some(crate::platforms::BlockSignal::LoginWall)
            }
        ));
    }
}
