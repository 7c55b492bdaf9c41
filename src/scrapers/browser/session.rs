//! Page interaction surface used by platform wait hooks.

use std::time::Duration;

use async_trait::async_trait;

/// What a platform needs from a live page before the markup snapshot.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Wait until `selector` matches an element. `false` on timeout or error.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool;

    /// Let the page run for a fixed duration.
    async fn settle(&self, duration: Duration);
}

#[cfg(feature = "browser")]
pub(crate) use chrome::ChromePage;

#[cfg(feature = "browser")]
mod chrome {
    use std::time::Duration;

    use async_trait::async_trait;
    use chromiumoxide::Page;
    use tokio::time::Instant;
    use tracing::debug;

    use super::PageSession;

    const POLL_INTERVAL: Duration = Duration::from_millis(250);

    /// A live chromiumoxide tab.
    pub(crate) struct ChromePage {
        page: Page,
    }

    impl ChromePage {
        pub(crate) fn new(page: Page) -> Self {
            Self { page }
        }
    }

    #[async_trait]
    impl PageSession for ChromePage {
        async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool {
            let deadline = Instant::now() + timeout;
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match tokio::time::timeout(remaining, self.page.find_element(selector)).await {
                    Ok(Ok(_)) => {
                        debug!("Selector matched: {}", selector);
                        return true;
                    }
                    Ok(Err(_)) | Err(_) => {}
                }
                if Instant::now() + POLL_INTERVAL >= deadline {
                    return false;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }

        async fn settle(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }
}
