//! ZipRecruiter job pages.

use scraper::Html;

use super::selectors::{first_inner_html, first_text};
use super::{PlatformExtractor, WaitPlan};
use crate::document::JobFields;
use crate::platform::Platform;

const TITLE: &[&str] = &["h1.job_title", "h1"];
const COMPANY: &[&str] = &[".hiring_company_text", "[data-testid='job-company']"];
const DESCRIPTION: &[&str] = &[".job_description", "[data-testid='job-description']"];
const LOCATION: &[&str] = &[".location_text", "[data-testid='job-location']"];

pub struct ZipRecruiterExtractor;

impl PlatformExtractor for ZipRecruiterExtractor {
    fn platform(&self) -> Platform {
        Platform::ZipRecruiter
    }

    fn wait_plan(&self) -> WaitPlan {
        WaitPlan::new(".job_description, [data-testid='job-description']")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_testid_variant() {
        let html = r#"
            <h1>Warehouse Lead</h1>
            <a data-testid="job-company">Logistics Co</a>
            <p data-testid="job-location">Denver, CO</p>
            <div data-testid="job-description"><p>Lead a team of 10.</p></div>"#;

        let fields = ZipRecruiterExtractor.extract_fields(html);
        assert_eq!(fields.title.as_deref(), Some("Warehouse Lead"));
        assert_eq!(fields.company.as_deref(), Some("Logistics Co"));
        assert_eq!(fields.location.as_deref(), Some("Denver, CO"));
        assert_eq!(fields.description.as_deref(), Some("<p>Lead a team of 10.</p>"));
    }
}
