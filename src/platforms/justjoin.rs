//! JustJoin.it offer pages.

use scraper::Html;

use super::selectors::{all_texts, first_inner_html, first_text};
use super::{PlatformExtractor, WaitPlan};
use crate::document::JobFields;
use crate::platform::Platform;

const TITLE: &[&str] = &["h1"];
const COMPANY: &[&str] = &["[data-testid='text-company-name']", ".css-1x9zltl"];
const DESCRIPTION: &[&str] = &["[data-testid='job-offer-description']", ".css-1wbz3t9"];
const LOCATION: &[&str] = &["[data-testid='text-location']", ".css-1o4wo1x"];
const TECH_CHIPS: &str = "[data-testid='chip'], .css-1eroaag";

pub struct JustJoinExtractor;

impl PlatformExtractor for JustJoinExtractor {
    fn platform(&self) -> Platform {
        Platform::JustJoin
    }

    fn wait_plan(&self) -> WaitPlan {
        WaitPlan::new("[data-testid='job-offer-description'], .css-1wbz3t9")
    }

    fn extract_fields(&self, html: &str) -> JobFields {
        let document = Html::parse_document(html);
        let chips = all_texts(&document, TECH_CHIPS);

        JobFields {
            title: first_text(&document, TITLE),
            company: first_text(&document, COMPANY),
            location: first_text(&document, LOCATION),
            technologies: (!chips.is_empty()).then(|| chips.join(", ")),
            description: first_inner_html(&document, DESCRIPTION),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DEFAULT_MAX_CHARS;

    #[test]
    fn test_extract_offer_with_chips() {
        let html = r#"
            <h1>Senior Rust Developer</h1>
            <span data-testid="text-company-name">Softwarehouse</span>
            <span data-testid="text-location">Kraków</span>
            <div><div data-testid="chip">Rust</div><div data-testid="chip">PostgreSQL</div><div class="css-1eroaag">Kafka</div></div>
            <div data-testid="job-offer-description"><p>Build trading systems.</p></div>"#;

        let text = JustJoinExtractor.extract_text(html, DEFAULT_MAX_CHARS);
        assert_eq!(
            text,
            "Position: Senior Rust Developer\n\nCompany: Softwarehouse\n\nLocation: Kraków\n\n\
             Technologies: Rust, PostgreSQL, Kafka\n\nDescription:\nBuild trading systems."
        );
    }

    #[test]
    fn test_no_chips_means_no_technologies() {
        let fields = JustJoinExtractor.extract_fields("<h1>Dev</h1>");
        assert_eq!(fields.technologies, None);
    }
}
