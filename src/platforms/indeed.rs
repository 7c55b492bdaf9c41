//! Indeed `/viewjob` pages.

use scraper::Html;

use super::selectors::{first_inner_html, first_text};
use super::{PlatformExtractor, WaitPlan};
use crate::document::JobFields;
use crate::platform::Platform;

const TITLE: &[&str] = &[
    ".jobsearch-JobInfoHeader-title",
    "[data-testid='jobsearch-JobInfoHeader-title']",
    "h1",
];
const COMPANY: &[&str] = &[
    "[data-testid='inlineHeader-companyName']",
    "[data-company-name='true']",
    ".jobsearch-CompanyInfoContainer",
];
const DESCRIPTION: &[&str] = &["#jobDescriptionText", ".jobsearch-JobComponent-description"];
const LOCATION: &[&str] = &[
    "[data-testid='inlineHeader-companyLocation']",
    "[data-testid='job-location']",
    ".jobsearch-JobInfoHeader-subtitle",
];
const EMPLOYMENT_TYPE: &[&str] = &[
    "[data-testid='jobsearch-JobMetadataHeader-item'] span",
    "#salaryInfoAndJobType .css-k5flys",
];

pub struct IndeedExtractor;

impl PlatformExtractor for IndeedExtractor {
    fn platform(&self) -> Platform {
        Platform::Indeed
    }

    fn wait_plan(&self) -> WaitPlan {
        WaitPlan::new("#jobDescriptionText, [data-testid='jobsearch-JobComponent']")
    }

    fn extract_fields(&self, html: &str) -> JobFields {
        let document = Html::parse_document(html);
        JobFields {
            title: first_text(&document, TITLE),
            company: first_text(&document, COMPANY),
            location: first_text(&document, LOCATION),
            employment_type: first_text(&document, EMPLOYMENT_TYPE),
            description: first_inner_html(&document, DESCRIPTION),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_viewjob_page() {
        let html = r#"
            <div data-testid="jobsearch-JobComponent">
              <h1 class="jobsearch-JobInfoHeader-title"><span>Backend Developer</span><span> - job post</span></h1>
              <div data-testid="inlineHeader-companyName"><a>Initech</a></div>
              <div data-testid="inlineHeader-companyLocation">Austin, TX</div>
              <div id="jobDescriptionText"><p>Maintain TPS &lt;reports&gt;.</p><ul><li>Go</li></ul></div>
            </div>"#;

        let fields = IndeedExtractor.extract_fields(html);
        assert_eq!(fields.title.as_deref(), Some("Backend Developer - job post"));
        assert_eq!(fields.company.as_deref(), Some("Initech"));
        assert_eq!(fields.location.as_deref(), Some("Austin, TX"));
        assert!(fields.description.unwrap().contains("<li>Go</li>"));
    }

    #[test]
    fn test_falls_back_to_h1_and_legacy_description() {
        let html = r#"
            <h1>QA Analyst</h1>
            <div class="jobsearch-JobComponent-description">Test things thoroughly.</div>"#;

        let fields = IndeedExtractor.extract_fields(html);
        assert_eq!(fields.title.as_deref(), Some("QA Analyst"));
        assert_eq!(fields.description.as_deref(), Some("Test things thoroughly."));
        assert_eq!(fields.company, None);
    }
}
