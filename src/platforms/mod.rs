//! Site-specific wait and extraction logic.
//!
//! Each supported site gets a [`PlatformExtractor`]: a wait plan the renderer
//! runs before snapshotting the page, and selector chains that turn rendered
//! markup into [`JobFields`]. The dispatch table is static and immutable.

mod flexjobs;
mod google_jobs;
mod indeed;
mod justjoin;
mod linkedin;
pub mod selectors;
mod ziprecruiter;

pub use flexjobs::FlexJobsExtractor;
pub use google_jobs::GoogleJobsExtractor;
pub use indeed::IndeedExtractor;
pub use justjoin::JustJoinExtractor;
pub use linkedin::LinkedInExtractor;
pub use ziprecruiter::ZipRecruiterExtractor;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::document::{assemble, JobFields};
use crate::platform::Platform;
use crate::scrapers::PageSession;

/// How long to wait for a site's content before snapshotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPlan {
    /// Comma-separated CSS selector list; any match counts as ready.
    pub ready_selector: &'static str,
    pub timeout: Duration,
    /// Extra delay after the selector appears, for client-side hydration.
    pub settle_after: Option<Duration>,
    /// Delay used instead when the selector never appears.
    pub fallback_delay: Duration,
}

impl WaitPlan {
    /// 10 s for the selector, 3 s fallback settle.
    pub const fn new(ready_selector: &'static str) -> Self {
        Self {
            ready_selector,
            timeout: Duration::from_secs(10),
            settle_after: None,
            fallback_delay: Duration::from_secs(3),
        }
    }
}

/// Wait and extract operations for one site.
#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    fn platform(&self) -> Platform;

    fn wait_plan(&self) -> WaitPlan;

    /// Give async content a chance to appear. Never fails: a missing
    /// selector degrades to a fixed delay.
    async fn wait(&self, session: &dyn PageSession) {
        let plan = self.wait_plan();
        if session
            .wait_for_selector(plan.ready_selector, plan.timeout)
            .await
        {
            if let Some(settle) = plan.settle_after {
                session.settle(settle).await;
            }
        } else {
            debug!(
                "{}: ready selector not found within {:?}, settling for {:?}",
                self.platform(),
                plan.timeout,
                plan.fallback_delay
            );
            session.settle(plan.fallback_delay).await;
        }
    }

    /// Pull fields out of rendered markup using the site's selector chains.
    fn extract_fields(&self, html: &str) -> JobFields;

    /// Extract and assemble into the canonical document. Blank when nothing
    /// usable was found.
    fn extract_text(&self, html: &str, max_chars: usize) -> String {
        assemble(&self.extract_fields(html), max_chars)
    }
}

static LINKEDIN: LinkedInExtractor = LinkedInExtractor;
static INDEED: IndeedExtractor = IndeedExtractor;
static JUSTJOIN: JustJoinExtractor = JustJoinExtractor;
static GOOGLE_JOBS: GoogleJobsExtractor = GoogleJobsExtractor;
static ZIPRECRUITER: ZipRecruiterExtractor = ZipRecruiterExtractor;
static FLEXJOBS: FlexJobsExtractor = FlexJobsExtractor;

/// Extractor for a platform; `None` for `Unsupported`.
pub fn extractor_for(platform: Platform) -> Option<&'static dyn PlatformExtractor> {
    match platform {
        Platform::LinkedIn => Some(&LINKEDIN),
        Platform::Indeed => Some(&INDEED),
        Platform::JustJoin => Some(&JUSTJOIN),
        Platform::GoogleJobs => Some(&GOOGLE_JOBS),
        Platform::ZipRecruiter => Some(&ZIPRECRUITER),
        Platform::FlexJobs => Some(&FLEXJOBS),
        Platform::Unsupported => None,
    }
}

/// A page condition that keeps content from being readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockSignal {
    BotCheck,
    LoginWall,
    AccessDenied,
}

impl BlockSignal {
    /// One sentence for the end user.
    pub fn describe(&self) -> &'static str {
        match self {
            BlockSignal::BotCheck => "The site showed a CAPTCHA or bot check instead of the listing.",
            BlockSignal::LoginWall => "The site requires a login to view this listing.",
            BlockSignal::AccessDenied => "The site denied access to this page.",
        }
    }
}

impl fmt::Display for BlockSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            BlockSignal::BotCheck => "bot_check",
            BlockSignal::LoginWall => "login_wall",
            BlockSignal::AccessDenied => "access_denied",
        };
        f.write_str(tag)
    }
}

const BLOCK_SIGNATURES: &[(BlockSignal, &[&str])] = &[
    (
        BlockSignal::BotCheck,
        &[
            "g-recaptcha",
            "h-captcha",
            "cf-challenge",
            "challenge-platform",
            "are you a robot",
            "verify you are human",
            "unusual traffic from your computer",
        ],
    ),
    (
        BlockSignal::LoginWall,
        &[
            "join to see full job details",
            "authwall",
            "sign in to view",
            "sign in to continue",
            "log in to continue",
        ],
    ),
    (
        BlockSignal::AccessDenied,
        &[
            "access denied",
            "403 forbidden",
            "you don't have permission to access",
            "request blocked",
        ],
    ),
];

/// Look for bot-check, login-wall or access-denied markers.
///
/// Detection only; nothing here tries to get past the condition.
pub fn detect_block_signal(html: &str) -> Option<BlockSignal> {
    let lower = html.to_lowercase();
    BLOCK_SIGNATURES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(signal, _)| *signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedSession {
        selector_present: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageSession for ScriptedSession {
        async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool {
            self.calls
                .lock()
                .unwrap()
                .push(format!("wait {} {:?}", selector, timeout));
            self.selector_present
        }

        async fn settle(&self, duration: Duration) {
            self.calls.lock().unwrap().push(format!("settle {:?}", duration));
        }
    }

    #[test]
    fn test_every_supported_platform_has_extractor() {
        for platform in Platform::SUPPORTED {
            let extractor = extractor_for(platform).unwrap();
            assert_eq!(extractor.platform(), platform);
        }
        assert!(extractor_for(Platform::Unsupported).is_none());
    }

    #[tokio::test]
    async fn test_wait_found_skips_fallback() {
        let session = ScriptedSession {
            selector_present: true,
            ..Default::default()
        };
        INDEED.wait(&session).await;
        let calls = session.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("wait #jobDescriptionText"));
    }

    #[tokio::test]
    async fn test_wait_timeout_settles() {
        let session = ScriptedSession::default();
        LINKEDIN.wait(&session).await;
        let calls = session.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], "settle 3s");
    }

    #[tokio::test]
    async fn test_wait_found_with_hydration_settle() {
        let session = ScriptedSession {
            selector_present: true,
            ..Default::default()
        };
        GOOGLE_JOBS.wait(&session).await;
        let calls = session.calls.lock().unwrap();
        assert!(calls[0].ends_with("15s"));
        assert_eq!(calls[1], "settle 3s");
    }

    #[test]
    fn test_detect_block_signal() {
        assert_eq!(
            detect_block_signal(r#"<div class="g-recaptcha"></div>"#),
            Some(BlockSignal::BotCheck)
        );
        assert_eq!(
            detect_block_signal("<p>Join to see full job details</p>"),
            Some(BlockSignal::LoginWall)
        );
        assert_eq!(
            detect_block_signal("<title>Access Denied</title>"),
            Some(BlockSignal::AccessDenied)
        );
        assert_eq!(detect_block_signal("<h1>Rust Engineer</h1>"), None);
    }

    #[test]
    fn test_login_wall_description_mentions_login() {
        assert!(BlockSignal::LoginWall.describe().contains("login"));
        assert_eq!(BlockSignal::LoginWall.to_string(), "login_wall");
    }
}
