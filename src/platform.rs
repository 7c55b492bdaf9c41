//! Platform detection, URL normalization and listing-shape validation.
//!
//! Detection is host based so the patterns can never overlap: a LinkedIn
//! link that merely mentions `indeed.com` in its query string is still a
//! LinkedIn link.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{ExtractionError, ExtractionResult};

/// Supported job sites, plus the `Unsupported` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    LinkedIn,
    Indeed,
    JustJoin,
    GoogleJobs,
    ZipRecruiter,
    FlexJobs,
    Unsupported,
}

/// Host pattern, optional path pattern, platform. First match wins.
static PLATFORM_PATTERNS: LazyLock<Vec<(Regex, Option<Regex>, Platform)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"(?i)(^|\.)linkedin\.com$").unwrap(), None, Platform::LinkedIn),
        (
            Regex::new(r"(?i)(^|\.)indeed\.[a-z]{2,}(\.[a-z]{2})?$").unwrap(),
            None,
            Platform::Indeed,
        ),
        (Regex::new(r"(?i)(^|\.)justjoin\.it$").unwrap(), None, Platform::JustJoin),
        (Regex::new(r"(?i)^jobs\.google\.com$").unwrap(), None, Platform::GoogleJobs),
        (
            Regex::new(r"(?i)(^|\.)google\.com$").unwrap(),
            Some(Regex::new(r"(?i)^/about/careers").unwrap()),
            Platform::GoogleJobs,
        ),
        (
            Regex::new(r"(?i)(^|\.)ziprecruiter\.[a-z]{2,}(\.[a-z]{2})?$").unwrap(),
            None,
            Platform::ZipRecruiter,
        ),
        (Regex::new(r"(?i)(^|\.)flexjobs\.com$").unwrap(), None, Platform::FlexJobs),
    ]
});

static LINKEDIN_VIEW_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/jobs/view/\d+").unwrap());
static LINKEDIN_SLUG_VIEW_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^/jobs/view/[^/]*?-(\d+)/?$").unwrap());
static ZIPRECRUITER_JOBS_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/jobs/?$").unwrap());
static INDEED_SEARCH_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(^|/)jobs/?$|^/q-").unwrap());

impl Platform {
    /// Every real platform, in detection order.
    pub const SUPPORTED: [Platform; 6] = [
        Platform::LinkedIn,
        Platform::Indeed,
        Platform::JustJoin,
        Platform::GoogleJobs,
        Platform::ZipRecruiter,
        Platform::FlexJobs,
    ];

    /// Detect the platform a URL belongs to.
    ///
    /// Input that does not parse as a URL with a host is `Unsupported`.
    pub fn detect(raw_url: &str) -> Platform {
        match Url::parse(raw_url.trim()) {
            Ok(url) => Self::detect_parsed(&url),
            Err(_) => Platform::Unsupported,
        }
    }

    fn detect_parsed(url: &Url) -> Platform {
        let Some(host) = url.host_str() else {
            return Platform::Unsupported;
        };
        let path = url.path();

        PLATFORM_PATTERNS
            .iter()
            .find(|(host_re, path_re, _)| {
                host_re.is_match(host) && path_re.as_ref().map_or(true, |re| re.is_match(path))
            })
            .map(|(_, _, platform)| *platform)
            .unwrap_or(Platform::Unsupported)
    }

    /// Human-readable site name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Indeed => "Indeed",
            Platform::JustJoin => "JustJoin",
            Platform::GoogleJobs => "Google Jobs",
            Platform::ZipRecruiter => "ZipRecruiter",
            Platform::FlexJobs => "FlexJobs",
            Platform::Unsupported => "unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unsupported)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A URL that passed detection, normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub platform: Platform,
    pub url: Url,
}

/// Detect, normalize and validate a raw URL.
///
/// Performs no network I/O; any error here is terminal.
pub fn resolve(raw_url: &str) -> ExtractionResult<ResolvedUrl> {
    let platform = Platform::detect(raw_url);
    if !platform.is_supported() {
        return Err(ExtractionError::UnsupportedPlatform);
    }

    let parsed = Url::parse(raw_url.trim()).map_err(|e| ExtractionError::InvalidUrl {
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractionError::InvalidUrl {
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    let url = normalize(&parsed, platform);
    if url != parsed {
        debug!("Normalized {} -> {}", parsed, url);
    }
    validate(&url, platform)?;

    Ok(ResolvedUrl { platform, url })
}

/// Rewrite platform-specific URL shapes into their canonical job page.
pub fn normalize(url: &Url, platform: Platform) -> Url {
    match platform {
        Platform::LinkedIn => normalize_linkedin(url),
        Platform::Indeed => normalize_indeed(url),
        _ => url.clone(),
    }
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

fn normalize_linkedin(url: &Url) -> Url {
    // /jobs/search/?currentJobId=123 and /jobs/collections/...?currentJobId=123
    if let Some(job_id) = query_param(url, "currentJobId") {
        if !url.path().to_ascii_lowercase().contains("/jobs/view/") {
            return linkedin_view_url(&job_id).unwrap_or_else(|| url.clone());
        }
    }

    // /jobs/view/senior-rust-engineer-at-acme-123456/
    if let Some(caps) = LINKEDIN_SLUG_VIEW_PATH.captures(url.path()) {
        if let Some(canonical) = linkedin_view_url(&caps[1]) {
            return canonical;
        }
    }

    url.clone()
}

fn linkedin_view_url(job_id: &str) -> Option<Url> {
    Url::parse(&format!("https://www.linkedin.com/jobs/view/{}/", job_id)).ok()
}

fn normalize_indeed(url: &Url) -> Url {
    if url.path().to_ascii_lowercase().contains("/viewjob") {
        return url.clone();
    }
    let Some(job_key) = query_param(url, "vjk") else {
        return url.clone();
    };
    let Some(host) = url.host_str() else {
        return url.clone();
    };

    let mut canonical = url.clone();
    canonical.set_path("/viewjob");
    canonical.set_query(None);
    canonical.query_pairs_mut().append_pair("jk", &job_key);
    if canonical.set_scheme("https").is_err() {
        return url.clone();
    }
    debug!("Indeed search URL with vjk on {}, using job key {}", host, job_key);
    canonical
}

/// Reject search/collection pages that are not a single job posting.
pub fn validate(url: &Url, platform: Platform) -> ExtractionResult<()> {
    let path = url.path().to_ascii_lowercase();

    match platform {
        Platform::FlexJobs => {
            if path.contains("/search") {
                return Err(ExtractionError::invalid_listing(
                    platform,
                    "This looks like a search page, not a specific job listing. Please paste the URL of a single job posting from FlexJobs.",
                ));
            }
        }
        Platform::LinkedIn => {
            if !LINKEDIN_VIEW_PATH.is_match(&path) {
                return Err(ExtractionError::invalid_listing(
                    platform,
                    "This looks like a LinkedIn feed or search page. Please paste the URL of a specific job posting (e.g. linkedin.com/jobs/view/123456).",
                ));
            }
        }
        Platform::Indeed => {
            if INDEED_SEARCH_PATH.is_match(&path) && !path.contains("/viewjob") {
                return Err(ExtractionError::invalid_listing(
                    platform,
                    "This looks like an Indeed search page. Please paste the URL of a specific job posting.",
                ));
            }
        }
        Platform::ZipRecruiter => {
            if path.contains("/search") || ZIPRECRUITER_JOBS_SUFFIX.is_match(&path) {
                return Err(ExtractionError::invalid_listing(
                    platform,
                    "This looks like a ZipRecruiter search page. Please paste the URL of a specific job posting.",
                ));
            }
        }
        Platform::JustJoin | Platform::GoogleJobs => {}
        Platform::Unsupported => return Err(ExtractionError::UnsupportedPlatform),
    }

    Ok(())
}
