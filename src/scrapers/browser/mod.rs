//! Headless rendering stage.
//!
//! Uses chromiumoxide (CDP). Every render launches its own browser process
//! with a throwaway profile, so no cookies or storage leak between requests.

mod config;
mod session;
#[cfg(feature = "browser")]
mod stealth;

pub use config::BrowserEngineConfig;
pub use session::PageSession;

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::platform::Platform;

/// Produce fully rendered markup for a job page.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &Url, platform: Platform) -> Result<String>;
}

#[cfg(feature = "browser")]
pub use chrome::ChromeRenderer;

#[cfg(feature = "browser")]
mod chrome {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{anyhow, bail, Context, Result};
    use async_trait::async_trait;
    use chromiumoxide::cdp::browser_protocol::emulation::{
        SetDeviceMetricsOverrideParams, SetLocaleOverrideParams,
    };
    use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
    use chromiumoxide::cdp::browser_protocol::page::{
        AddScriptToEvaluateOnNewDocumentParams, EventLifecycleEvent, NavigateParams,
        SetLifecycleEventsEnabledParams,
    };
    use chromiumoxide::{Browser, BrowserConfig, Page};
    use futures::StreamExt;
    use tempfile::TempDir;
    use tokio::sync::{OwnedSemaphorePermit, Semaphore};
    use tokio::task::JoinHandle;
    use tracing::{debug, info, warn};
    use url::Url;

    use super::session::ChromePage;
    use super::stealth::{stealth_script, WAIT_FOR_READY_SCRIPT};
    use super::{BrowserEngineConfig, PageRenderer};
    use crate::platform::Platform;
    use crate::platforms::{detect_block_signal, extractor_for};

    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &[&str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    const CHROME_COMMANDS: &[&str] = &[
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ];

    /// Renders pages in short-lived Chrome processes.
    pub struct ChromeRenderer {
        config: BrowserEngineConfig,
        user_agent: String,
        accept_language: String,
        permits: Arc<Semaphore>,
    }

    /// One browser process plus its CDP handler task.
    ///
    /// `shutdown` closes Chrome cleanly. If the render future is dropped
    /// instead, `Drop` aborts the handler, chromiumoxide kills the child
    /// process and the profile directory is removed.
    struct ChromeSession {
        browser: Browser,
        handler: JoinHandle<()>,
        _permit: OwnedSemaphorePermit,
        _profile: TempDir,
    }

    impl ChromeSession {
        async fn shutdown(mut self) {
            if let Err(e) = self.browser.close().await {
                debug!("Browser close failed: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                debug!("Browser wait failed: {}", e);
            }
        }
    }

    impl Drop for ChromeSession {
        fn drop(&mut self) {
            self.handler.abort();
        }
    }

    impl ChromeRenderer {
        pub fn new(config: BrowserEngineConfig, user_agent: String, accept_language: String) -> Self {
            let permits = Arc::new(Semaphore::new(config.max_sessions.max(1)));
            Self {
                config,
                user_agent,
                accept_language,
                permits,
            }
        }

        /// Find a Chrome executable: configured path, known install
        /// locations, then `PATH`.
        fn find_chrome(configured: Option<&Path>) -> Result<PathBuf> {
            if let Some(path) = configured {
                if path.exists() {
                    return Ok(path.to_path_buf());
                }
                warn!("Configured Chrome path {} does not exist", path.display());
            }

            for path in CHROME_PATHS {
                let p = Path::new(path);
                if p.exists() {
                    debug!("Found Chrome at: {}", path);
                    return Ok(p.to_path_buf());
                }
            }

            for cmd in CHROME_COMMANDS {
                if let Ok(path) = which::which(cmd) {
                    debug!("Found Chrome in PATH: {}", path.display());
                    return Ok(path);
                }
            }

            Err(anyhow!(
                "Chrome/Chromium not found. Install it or set CHROME_PATH:\n\
                 - Arch/Manjaro: sudo pacman -S chromium\n\
                 - Ubuntu/Debian: sudo apt install chromium-browser\n\
                 - Fedora: sudo dnf install chromium"
            ))
        }

        async fn launch(&self) -> Result<ChromeSession> {
            let permit = self
                .permits
                .clone()
                .acquire_owned()
                .await
                .context("Render semaphore closed")?;

            let chrome_path = Self::find_chrome(self.config.chrome_path.as_deref())?;
            let profile = tempfile::Builder::new()
                .prefix("jobtext-chrome-")
                .tempdir()
                .context("Failed to create browser profile directory")?;

            info!("Launching browser (headless={})", self.config.headless);

            let mut builder = BrowserConfig::builder()
                .chrome_executable(chrome_path)
                .user_data_dir(profile.path())
                .window_size(self.config.viewport_width, self.config.viewport_height);

            // with_head means NOT headless
            if !self.config.headless {
                builder = builder.with_head();
            }

            builder = builder
                .arg("--disable-blink-features=AutomationControlled")
                .arg("--no-sandbox")
                .arg("--disable-setuid-sandbox")
                .arg("--disable-dev-shm-usage")
                .arg("--disable-gpu")
                .arg("--no-first-run")
                .arg("--no-default-browser-check")
                .arg(format!("--lang={}", self.config.locale));

            for arg in &self.config.chrome_args {
                builder = builder.arg(arg);
            }

            let config = builder
                .build()
                .map_err(|e| anyhow!("Failed to build browser config: {}", e))?;

            let (browser, mut handler) = Browser::launch(config)
                .await
                .context("Failed to launch browser")?;

            let handler = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(ChromeSession {
                browser,
                handler,
                _permit: permit,
                _profile: profile,
            })
        }

        /// Identity overrides applied before the first navigation.
        async fn prepare_page(&self, page: &Page) -> Result<()> {
            let mut user_agent = SetUserAgentOverrideParams::new(self.user_agent.clone());
            user_agent.accept_language = Some(self.accept_language.clone());
            page.execute(user_agent)
                .await
                .context("Failed to set user agent")?;

            page.execute(SetDeviceMetricsOverrideParams::new(
                i64::from(self.config.viewport_width),
                i64::from(self.config.viewport_height),
                1.0,
                false,
            ))
            .await
            .context("Failed to set viewport")?;

            let locale = SetLocaleOverrideParams::builder()
                .locale(self.config.locale.clone())
                .build();
            if let Err(e) = page.execute(locale).await {
                // Not every Chrome build supports locale emulation.
                debug!("Locale override skipped: {}", e);
            }

            page.execute(AddScriptToEvaluateOnNewDocumentParams::new(stealth_script(
                &self.config.locale,
            )))
            .await
            .context("Failed to install page scripts")?;

            Ok(())
        }

        async fn navigate(&self, page: &Page, url: &Url) -> Result<()> {
            let idle_timeout = Duration::from_secs(self.config.navigation_timeout_secs);
            match tokio::time::timeout(idle_timeout, navigate_until_idle(page, url)).await {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(e)) => warn!("Network-idle navigation failed for {}: {:#}", url, e),
                Err(_) => warn!(
                    "Network never went idle for {} within {:?}, falling back to DOM ready",
                    url, idle_timeout
                ),
            }

            let ready_timeout = Duration::from_secs(self.config.fallback_timeout_secs);
            match tokio::time::timeout(ready_timeout, navigate_until_ready(page, url)).await {
                Ok(result) => result?,
                Err(_) => bail!("Timed out after {:?} waiting for {} to load", ready_timeout, url),
            }

            tokio::time::sleep(Duration::from_millis(self.config.settle_millis)).await;
            Ok(())
        }

        async fn render_in(&self, session: &ChromeSession, url: &Url, platform: Platform) -> Result<String> {
            let page = session
                .browser
                .new_page("about:blank")
                .await
                .context("Failed to open page")?;

            self.prepare_page(&page).await?;
            self.navigate(&page, url).await?;

            if let Some(extractor) = extractor_for(platform) {
                extractor.wait(&ChromePage::new(page.clone())).await;
            }

            let content = page.content().await.context("Failed to read page content")?;
            if let Some(signal) = detect_block_signal(&content) {
                warn!("Rendered page for {} shows {}", url, signal);
            }

            if let Err(e) = page.close().await {
                debug!("Page close failed: {}", e);
            }
            Ok(content)
        }
    }

    fn navigate_params(url: &Url) -> Result<NavigateParams> {
        NavigateParams::builder()
            .url(url.as_str())
            .build()
            .map_err(|e| anyhow!("Invalid URL: {}", e))
    }

    async fn navigate_until_idle(page: &Page, url: &Url) -> Result<()> {
        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .context("Failed to enable lifecycle events")?;
        let mut events = page
            .event_listener::<EventLifecycleEvent>()
            .await
            .context("Failed to subscribe to lifecycle events")?;

        info!("Navigating to {}", url);
        let navigation = page
            .execute(navigate_params(url)?)
            .await
            .context("Navigation failed")?;
        if let Some(error) = &navigation.result.error_text {
            bail!("Navigation to {} failed: {}", url, error);
        }
        let loader_id = navigation.result.loader_id.clone();

        while let Some(event) = events.next().await {
            let same_document = loader_id.as_ref().map_or(true, |id| *id == event.loader_id);
            if same_document && event.name == "networkIdle" {
                debug!("Network idle for {}", url);
                return Ok(());
            }
        }

        bail!("Lifecycle event stream ended before network idle")
    }

    async fn navigate_until_ready(page: &Page, url: &Url) -> Result<()> {
        let navigation = page
            .execute(navigate_params(url)?)
            .await
            .context("Navigation failed")?;
        if let Some(error) = &navigation.result.error_text {
            bail!("Navigation to {} failed: {}", url, error);
        }

        match page.evaluate(WAIT_FOR_READY_SCRIPT.to_string()).await {
            Ok(result) => {
                let state: String = result
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("Page ready state: {}", state);
            }
            Err(e) => debug!("Could not check ready state: {}", e),
        }
        Ok(())
    }

    #[async_trait]
    impl PageRenderer for ChromeRenderer {
        async fn render(&self, url: &Url, platform: Platform) -> Result<String> {
            let session = self.launch().await?;
            let result = self.render_in(&session, url, platform).await;
            session.shutdown().await;
            result
        }
    }

}

/// Stand-in when browser support is compiled out.
#[cfg(not(feature = "browser"))]
pub struct ChromeRenderer;

#[cfg(not(feature = "browser"))]
impl ChromeRenderer {
    pub fn new(_config: BrowserEngineConfig, _user_agent: String, _accept_language: String) -> Self {
        Self
    }
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, _url: &Url, _platform: Platform) -> Result<String> {
        Err(anyhow::anyhow!(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
        ))
    }
}
