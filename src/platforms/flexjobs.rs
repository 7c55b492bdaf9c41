//! FlexJobs job detail pages.

use scraper::Html;

use super::selectors::{first_inner_html, first_text};
use super::{PlatformExtractor, WaitPlan};
use crate::document::JobFields;
use crate::platform::Platform;

const TITLE: &[&str] = &["h1"];
const COMPANY: &[&str] = &[".company-name", "[data-testid='company-name']"];
const DESCRIPTION: &[&str] = &["#job-description", ".job-details", ".job-description-content"];
const LOCATION: &[&str] = &[".job-location", "[data-testid='job-location']"];

pub struct FlexJobsExtractor;

impl PlatformExtractor for FlexJobsExtractor {
    fn platform(&self) -> Platform {
        Platform::FlexJobs
    }

    fn wait_plan(&self) -> WaitPlan {
        WaitPlan::new("#job-description, .job-details")
    }

    fn extract_fields(&self, html: &str) -> JobFields {
        let document = Html::parse_document(html);
        JobFields {
            title: first_text(&document, TITLE),
            company: first_text(&document, COMPANY),
            location: first_text(&document, LOCATION),
            description: first_inner_html(&document, DESCRIPTION),
            ..Default::default()
        }
    }
}
