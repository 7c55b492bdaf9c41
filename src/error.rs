//! Classified extraction failures.
//!
//! Every variant that reaches a caller carries a next action for the user
//! (which sites work, or paste the description by hand). Intermediate stage
//! failures never show up here; the pipeline absorbs them.

use thiserror::Error;

use crate::platform::Platform;
use crate::platforms::BlockSignal;

/// Result type for the public extraction entry points.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Errors surfaced by [`crate::JobTextExtractor::extract`].
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("This URL isn't supported. Try {}.", supported_sites())]
    UnsupportedPlatform,

    #[error("This doesn't look like a valid job link ({reason}). Please paste a full https:// URL to a single job posting.")]
    InvalidUrl { reason: String },

    #[error("{guidance}")]
    InvalidListingShape {
        platform: Platform,
        guidance: String,
    },

    #[error("The page could not be loaded. The site may be down or blocking automated access. Try again, or paste the job description directly instead.")]
    PageLoad { reason: String },

    #[error("{}", empty_extraction_message(.signal))]
    EmptyExtraction { signal: Option<BlockSignal> },
}

impl ExtractionError {
    pub(crate) fn invalid_listing(platform: Platform, guidance: impl Into<String>) -> Self {
        Self::InvalidListingShape {
            platform,
            guidance: guidance.into(),
        }
    }

    /// All surfaced errors tell the user what to do next.
    pub fn is_user_actionable(&self) -> bool {
        true
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Short stable tag for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform => "unsupported_platform",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::InvalidListingShape { .. } => "invalid_listing_shape",
            Self::PageLoad { .. } => "page_load",
            Self::EmptyExtraction { .. } => "empty_extraction",
        }
    }
}

fn supported_sites() -> String {
    let names: Vec<&str> = Platform::SUPPORTED.iter().map(|p| p.display_name()).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        Some((last, _)) => (*last).to_string(),
        None => String::new(),
    }
}

fn empty_extraction_message(signal: &Option<BlockSignal>) -> String {
    let base = "Could not extract job details from this page.";
    let cause = match signal {
        Some(signal) => format!(" {}", signal.describe()),
        None => " The listing may require login, be expired, or use a format we can't read."
            .to_string(),
    };
    format!(
        "{}{} Try pasting the job description directly instead.",
        base, cause
    )
}
