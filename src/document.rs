//! Canonical job document assembly.

use serde::Serialize;

use crate::utils::{collapse_whitespace, strip_html, truncate_chars};

/// Default hard cap on the assembled document, in characters.
pub const DEFAULT_MAX_CHARS: usize = 8000;

/// Fields pulled out of a job page by any extraction stage.
///
/// Every field is optional and absent fields are never filled with
/// placeholders. `description` and `requirements` may hold HTML; the
/// single-line fields may too, since selector text sometimes carries markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobFields {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub technologies: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
}

impl JobFields {
    /// True when no field carries visible text.
    pub fn is_empty(&self) -> bool {
        assemble(self, usize::MAX).is_empty()
    }
}

/// Render fields into the canonical labeled document.
///
/// Sections appear in a fixed order and only when non-blank after cleaning.
/// The result is truncated to `max_chars` characters.
pub fn assemble(fields: &JobFields, max_chars: usize) -> String {
    let mut sections: Vec<String> = Vec::new();

    let inline = [
        ("Position", &fields.title),
        ("Company", &fields.company),
        ("Location", &fields.location),
        ("Employment Type", &fields.employment_type),
        ("Technologies", &fields.technologies),
    ];
    for (label, value) in inline {
        if let Some(text) = value.as_deref().map(clean_line).filter(|t| !t.is_empty()) {
            sections.push(format!("{}: {}", label, text));
        }
    }

    let blocks = [
        ("Description", &fields.description),
        ("Requirements", &fields.requirements),
    ];
    for (label, value) in blocks {
        if let Some(text) = value.as_deref().map(strip_html).filter(|t| !t.is_empty()) {
            sections.push(format!("{}:\n{}", label, text));
        }
    }

    let document = sections.join("\n\n");
    truncate_chars(&document, max_chars).to_string()
}

/// Strip markup and fold a fragment onto a single line.
pub fn clean_line(text: &str) -> String {
    collapse_whitespace(&strip_html(text))
}
