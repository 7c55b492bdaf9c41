//! JSON-LD `JobPosting` extraction.
//!
//! Job sites embed schema.org metadata in `<script type="application/ld+json">`
//! blocks. The posting may be the top-level value, an element of a top-level
//! array, or an element of an `@graph` container.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::{Map, Value};
use tracing::debug;

use crate::document::JobFields;

static LD_JSON_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// Default minimum description length for a posting to count as complete.
pub const DEFAULT_MIN_DESCRIPTION_CHARS: usize = 20;

/// One `JobPosting` entity as found in the page.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPosting {
    fields: Map<String, Value>,
}

impl StructuredPosting {
    /// Find the first `JobPosting` in document order.
    ///
    /// Blocks that fail to parse are skipped.
    pub fn extract(html: &str) -> Option<Self> {
        let document = Html::parse_document(html);

        for (index, script) in document.select(&LD_JSON_SELECTOR).enumerate() {
            let raw: String = script.text().collect();
            let value: Value = match serde_json::from_str(raw.trim()) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Skipping unparseable JSON-LD block {}: {}", index, e);
                    continue;
                }
            };

            if let Some(fields) = find_job_posting(&value) {
                debug!("Found JobPosting in JSON-LD block {}", index);
                return Some(Self {
                    fields: fields.clone(),
                });
            }
        }

        None
    }

    /// Wrap an already-parsed object. Returns `None` unless it is a `JobPosting`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) if is_job_posting(&fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn title(&self) -> Option<&str> {
        self.string_field("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.string_field("description")
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// A posting is usable only with a title and a description longer than
    /// `min_description_chars`. Teaser records that validate but carry no
    /// body fail this check.
    pub fn is_sufficient(&self, min_description_chars: usize) -> bool {
        let has_title = self.title().is_some();
        let description_len = self.description().map_or(0, |d| d.chars().count());
        has_title && description_len > min_description_chars
    }

    /// Map schema.org properties onto job fields. Missing properties stay `None`.
    pub fn to_fields(&self) -> JobFields {
        let requirements: Vec<String> = ["qualifications", "responsibilities", "experienceRequirements"]
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .filter_map(|value| joined_text(value, "\n"))
            .collect();

        let location = self
            .fields
            .get("jobLocation")
            .and_then(location_text)
            .or_else(|| self.is_remote().then(|| "Remote".to_string()));

        JobFields {
            title: self.title().map(str::to_string),
            company: self.fields.get("hiringOrganization").and_then(organization_name),
            location,
            employment_type: self
                .fields
                .get("employmentType")
                .and_then(|v| joined_text(v, ", ")),
            technologies: self.fields.get("skills").and_then(|v| joined_text(v, ", ")),
            description: self.description().map(str::to_string),
            requirements: (!requirements.is_empty()).then(|| requirements.join("\n\n")),
        }
    }

    fn is_remote(&self) -> bool {
        match self.fields.get("jobLocationType") {
            Some(Value::String(s)) => s.eq_ignore_ascii_case("TELECOMMUTE"),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .any(|s| s.eq_ignore_ascii_case("TELECOMMUTE")),
            _ => false,
        }
    }
}

fn find_job_posting(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map) if is_job_posting(map) => Some(map),
        Value::Object(map) => match map.get("@graph") {
            Some(Value::Array(items)) => first_posting(items),
            _ => None,
        },
        Value::Array(items) => first_posting(items),
        _ => None,
    }
}

fn first_posting(items: &[Value]) -> Option<&Map<String, Value>> {
    items.iter().find_map(|item| match item {
        Value::Object(map) if is_job_posting(map) => Some(map),
        _ => None,
    })
}

fn is_job_posting(map: &Map<String, Value>) -> bool {
    fn matches(type_name: &str) -> bool {
        type_name == "JobPosting" || type_name.ends_with("/JobPosting")
    }

    match map.get("@type") {
        Some(Value::String(s)) => matches(s),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

fn trimmed(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A string, or an array of strings joined with `separator`.
fn joined_text(value: &Value, separator: &str) -> Option<String> {
    match value {
        Value::String(_) => trimmed(value),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(trimmed).collect();
            (!parts.is_empty()).then(|| parts.join(separator))
        }
        _ => None,
    }
}

fn organization_name(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => trimmed(value),
        Value::Object(map) => map.get("name").and_then(trimmed),
        _ => None,
    }
}

fn location_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => trimmed(value),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(location_text).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Object(place) => match place.get("address") {
            Some(Value::Object(address)) => {
                let parts: Vec<String> = ["addressLocality", "addressRegion", "addressCountry"]
                    .iter()
                    .filter_map(|key| address.get(*key))
                    .filter_map(|part| match part {
                        Value::Object(country) => country.get("name").and_then(trimmed),
                        other => trimmed(other),
                    })
                    .collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            Some(address @ Value::String(_)) => trimmed(address),
            _ => place.get("name").and_then(trimmed),
        },
        _ => None,
    }
}
