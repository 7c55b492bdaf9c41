//! Ordered selector chains over parsed markup.
//!
//! Sites rename classes often, so each field lists several historical
//! selectors. The first selector whose first match has visible text wins.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::utils::collapse_whitespace;

fn parse(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("Ignoring invalid selector {:?}: {}", selector, e);
            None
        }
    }
}

fn first_match<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let parsed = parse(selector)?;
    document.select(&parsed).next()
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Single-line text of the first non-empty match in the chain.
pub fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        first_match(document, selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
    })
}

/// Inner HTML of the first match in the chain whose text is non-empty.
///
/// Markup is kept so paragraph and list structure survives into the
/// sanitizer.
pub fn first_inner_html(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let element = first_match(document, selector)?;
        if element_text(element).is_empty() {
            return None;
        }
        Some(element.inner_html())
    })
}

/// Raw text (whitespace preserved) of the first match in the chain.
pub fn first_raw_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        first_match(document, selector)
            .map(|element| element.text().collect::<String>())
            .filter(|text| !text.trim().is_empty())
    })
}

/// Text of every element matching `selector`, empties dropped.
pub fn all_texts(document: &Html, selector: &str) -> Vec<String> {
    let Some(parsed) = parse(selector) else {
        return Vec::new();
    };
    document
        .select(&parsed)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}
