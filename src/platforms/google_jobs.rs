//! Google Careers (`google.com/about/careers`) and `jobs.google.com`.
//!
//! Both are heavy single-page apps with obfuscated class names, so when no
//! description selector matches the visible text of the main content area
//! is used instead.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::Html;

use super::selectors::{first_inner_html, first_raw_text, first_text};
use super::{PlatformExtractor, WaitPlan};
use crate::document::JobFields;
use crate::platform::Platform;
use crate::utils::truncate_chars;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

const FALLBACK_MAX_CHARS: usize = 8000;
const FALLBACK_MIN_CHARS: usize = 100;

const TITLE: &[&str] = &[
    "h2.p1N2lc",
    "[data-id='job-detail'] h2",
    ".KLsYvd, h2.p6N3Vb",
    "h2",
];
const DESCRIPTION: &[&str] = &[
    "[data-id='job-detail']",
    ".gc-card__content",
    ".HBvzbc, .YgLbBe",
    ".description",
];
const LOCATION: &[&str] = &[".pwO9Dc", ".sMzDkb", ".location"];
const MAIN_CONTENT: &[&str] = &["main", "[role='main']", "body"];

pub struct GoogleJobsExtractor;

impl GoogleJobsExtractor {
    fn main_content_text(document: &Html) -> Option<String> {
        let raw = first_raw_text(document, MAIN_CONTENT)?;
        let folded = WHITESPACE_RUN.replace_all(&raw, "\n");
        let cleaned = truncate_chars(folded.trim(), FALLBACK_MAX_CHARS);
        (cleaned.chars().count() > FALLBACK_MIN_CHARS).then(|| cleaned.to_string())
    }
}

impl PlatformExtractor for GoogleJobsExtractor {
    fn platform(&self) -> Platform {
        Platform::GoogleJobs
    }

    fn wait_plan(&self) -> WaitPlan {
        WaitPlan {
            ready_selector: "[data-id='job-detail'], .gc-card, .VfPpkd-WsjYwc, .pE8vnd, .HBvzbc, h2",
            timeout: Duration::from_secs(15),
            settle_after: Some(Duration::from_secs(3)),
            fallback_delay: Duration::from_secs(5),
        }
    }

    fn extract_fields(&self, html: &str) -> JobFields {
        let document = Html::parse_document(html);
        let description = first_inner_html(&document, DESCRIPTION)
            .or_else(|| Self::main_content_text(&document));

        JobFields {
            title: first_text(&document, TITLE),
            company: Some("Google".to_string()),
            location: first_text(&document, LOCATION),
            description,
            ..Default::default()
        }
    }
}
