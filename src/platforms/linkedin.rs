//! LinkedIn job view pages (`/jobs/view/<id>/`).

use scraper::Html;

use super::selectors::{first_inner_html, first_text};
use super::{PlatformExtractor, WaitPlan};
use crate::document::JobFields;
use crate::platform::Platform;

const PARTIAL_VIEW_MARKER: &str = "Join to see full job details";
const PARTIAL_VIEW_NOTE: &str =
    "\n\n[Note: This listing may be partially visible — LinkedIn requires login for full details.]";

const TITLE: &[&str] = &[
    ".job-details-jobs-unified-top-card__job-title",
    ".jobs-unified-top-card__job-title",
    ".top-card-layout__title",
    "h1",
];
const COMPANY: &[&str] = &[
    ".jobs-unified-top-card__company-name",
    ".job-details-jobs-unified-top-card__company-name",
    ".topcard__org-name-link",
];
const DESCRIPTION: &[&str] = &[
    ".jobs-description__content",
    ".jobs-description",
    ".description__text",
    ".show-more-less-html__markup",
];
const LOCATION: &[&str] = &[
    ".jobs-unified-top-card__bullet",
    ".job-details-jobs-unified-top-card__primary-description-container",
    ".topcard__flavor--bullet",
];

pub struct LinkedInExtractor;

impl PlatformExtractor for LinkedInExtractor {
    fn platform(&self) -> Platform {
        Platform::LinkedIn
    }

    fn wait_plan(&self) -> WaitPlan {
        WaitPlan::new(".jobs-description, .job-view-layout, .description__text")
    }

    fn extract_fields(&self, html: &str) -> JobFields {
        let document = Html::parse_document(html);

        // Logged-out views truncate the body; say so instead of passing it off as complete.
        let mut description = first_inner_html(&document, DESCRIPTION);
        if html.contains(PARTIAL_VIEW_MARKER) {
            let mut body = description.unwrap_or_default();
            body.push_str(PARTIAL_VIEW_NOTE);
            description = Some(body);
        }

        JobFields {
            title: first_text(&document, TITLE),
            company: first_text(&document, COMPANY),
            location: first_text(&document, LOCATION),
            description,
            ..Default::default()
        }
    }
}
