//! End-to-end behaviour of the staged extractor with scripted page sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jobtext::{
    ExtractionError, ExtractorConfig, JobTextExtractor, PageFetcher, PageRenderer, Platform,
};
use url::Url;

#[derive(Default)]
struct CountingFetcher {
    body: Option<String>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl CountingFetcher {
    fn serving(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn fetch(&self, url: &Url) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        self.body
            .clone()
            .ok_or_else(|| anyhow::anyhow!("operation timed out"))
    }
}

#[derive(Default)]
struct CountingRenderer {
    body: String,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Platform)>>,
}

impl CountingRenderer {
    fn serving(body: &str) -> Self {
        Self {
            body: body.to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl PageRenderer for CountingRenderer {
    async fn render(&self, url: &Url, platform: Platform) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((url.to_string(), platform));
        Ok(self.body.clone())
    }
}

fn extractor(
    fetcher: &Arc<CountingFetcher>,
    renderer: &Arc<CountingRenderer>,
) -> JobTextExtractor {
    JobTextExtractor::with_components(
        ExtractorConfig::default(),
        fetcher.clone(),
        renderer.clone(),
    )
}

const JSON_LD_PAGE: &str = r#"<html><head>
<script type="application/ld+json">
{
  "@context": "https://schema.org/",
  "@type": "JobPosting",
  "title": "Senior Rust Engineer",
  "hiringOrganization": {"@type": "Organization", "name": "Acme"},
  "jobLocation": {"@type": "Place", "address": {"addressLocality": "Berlin", "addressCountry": "DE"}},
  "employmentType": "FULL_TIME",
  "description": "<p>Design and build the ingestion pipeline.</p><ul><li>Tokio</li></ul>"
}
</script></head><body></body></html>"#;

#[tokio::test]
async fn unsupported_host_never_touches_network() {
    let fetcher = Arc::new(CountingFetcher::serving(JSON_LD_PAGE));
    let renderer = Arc::new(CountingRenderer::serving(JSON_LD_PAGE));
    let extractor = extractor(&fetcher, &renderer);

    for url in [
        "https://example.com/jobs/123",
        "https://notlinkedin.com.evil.io/jobs/view/1",
        "not a url",
    ] {
        let err = extractor.extract(url).await.unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedPlatform), "{}", url);
    }

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn flexjobs_search_rejected_before_fetch() {
    let fetcher = Arc::new(CountingFetcher::serving(JSON_LD_PAGE));
    let renderer = Arc::new(CountingRenderer::serving(JSON_LD_PAGE));

    let err = extractor(&fetcher, &renderer)
        .extract("https://www.flexjobs.com/search?query=engineer")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExtractionError::InvalidListingShape {
            platform: Platform::FlexJobs,
            ..
        }
    ));
    assert!(err.user_message().contains("single job posting"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn linkedin_search_url_is_normalized_before_fetch() {
    let fetcher = Arc::new(CountingFetcher::serving(JSON_LD_PAGE));
    let renderer = Arc::new(CountingRenderer::default());

    let text = extractor(&fetcher, &renderer)
        .extract("https://www.linkedin.com/jobs/search/?currentJobId=987")
        .await
        .unwrap();

    assert!(text.starts_with("Position: Senior Rust Engineer"));
    assert_eq!(
        fetcher.urls.lock().unwrap().as_slice(),
        ["https://www.linkedin.com/jobs/view/987/"]
    );
}

#[tokio::test]
async fn sufficient_json_ld_in_fetched_markup_skips_rendering() {
    let fetcher = Arc::new(CountingFetcher::serving(JSON_LD_PAGE));
    let renderer = Arc::new(CountingRenderer::default());

    let text = extractor(&fetcher, &renderer)
        .extract("https://justjoin.it/job-offer/acme-senior-rust-engineer-berlin")
        .await
        .unwrap();

    assert_eq!(
        text,
        "Position: Senior Rust Engineer\n\n\
         Company: Acme\n\n\
         Location: Berlin, DE\n\n\
         Employment Type: FULL_TIME\n\n\
         Description:\nDesign and build the ingestion pipeline.\n\nTokio"
    );
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fetch_failure_falls_through_to_rendered_json_ld() {
    let fetcher = Arc::new(CountingFetcher::failing());
    let renderer = Arc::new(CountingRenderer::serving(JSON_LD_PAGE));

    let text = extractor(&fetcher, &renderer)
        .extract("https://www.ziprecruiter.com/c/Acme/Job/Senior-Rust-Engineer/-in-Berlin?jid=1")
        .await
        .unwrap();

    assert!(text.contains("Company: Acme"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(renderer.seen.lock().unwrap()[0].1, Platform::ZipRecruiter);
}

#[tokio::test]
async fn thin_json_ld_falls_through_to_selectors() {
    let thin = r#"<script type="application/ld+json">{"@type":"JobPosting","title":"Teaser","description":"Apply now"}</script>"#;
    let rendered = format!(
        "{}<h1 class=\"job_title\">Forklift Operator</h1><div class=\"job_description\"><p>Move pallets safely.</p></div>",
        thin
    );
    let fetcher = Arc::new(CountingFetcher::serving(thin));
    let renderer = Arc::new(CountingRenderer::serving(&rendered));

    let text = extractor(&fetcher, &renderer)
        .extract("https://www.ziprecruiter.com/c/Logistics/Job/Forklift-Operator?jid=9")
        .await
        .unwrap();

    assert_eq!(
        text,
        "Position: Forklift Operator\n\nDescription:\nMove pallets safely."
    );
}

#[tokio::test]
async fn indeed_viewjob_end_to_end() {
    let rendered = r#"<html><body>
        <h1 class="jobsearch-JobInfoHeader-title">Data Analyst</h1>
        <div data-testid="inlineHeader-companyName">Initech</div>
        <div id="jobDescriptionText">
            <p>Analyze <b>TPS</b> reports &amp; dashboards.</p>
            <ul><li>SQL</li><li>Python</li></ul>
        </div>
    </body></html>"#;
    let fetcher = Arc::new(CountingFetcher::serving("<html><body>loading</body></html>"));
    let renderer = Arc::new(CountingRenderer::serving(rendered));

    let text = extractor(&fetcher, &renderer)
        .extract("https://www.indeed.com/viewjob?jk=abc123")
        .await
        .unwrap();

    assert_eq!(text.lines().next(), Some("Position: Data Analyst"));
    assert!(text.contains("\n\nDescription:\n"));
    assert!(text.contains("Analyze TPS reports & dashboards."));
    assert!(text.contains("SQL"));
    assert!(!text.contains('<'));
    assert_eq!(
        renderer.seen.lock().unwrap()[0],
        ("https://www.indeed.com/viewjob?jk=abc123".to_string(), Platform::Indeed)
    );
}

#[tokio::test]
async fn nothing_anywhere_is_empty_extraction() {
    let fetcher = Arc::new(CountingFetcher::failing());
    let renderer = Arc::new(CountingRenderer::serving(
        "<html><body><div class=\"unrelated\"></div></body></html>",
    ));

    let err = extractor(&fetcher, &renderer)
        .extract("https://www.flexjobs.com/publicjobs/remote-writer-123")
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractionError::EmptyExtraction { signal: None }));
    assert!(err.user_message().contains("pasting the job description"));
    assert!(err.is_user_actionable());
}

#[tokio::test]
async fn output_respects_configured_cap() {
    let fetcher = Arc::new(CountingFetcher::serving(JSON_LD_PAGE));
    let renderer = Arc::new(CountingRenderer::default());
    let mut config = ExtractorConfig::default();
    config.output.max_chars = 30;

    let text = JobTextExtractor::with_components(config, fetcher, renderer)
        .extract("https://justjoin.it/job-offer/acme-senior-rust-engineer-berlin")
        .await
        .unwrap();

    assert_eq!(text.chars().count(), 30);
}
