use std::time::{Duration, Instant};

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use tracing::{debug, info, warn};

use crate::config::FinderConfig;
use crate::error::FinderError;
use crate::traits::{self, FetchMethod, PageFetcher, SiteProfile};

/// Clicks anything that looks like a close or dismiss control on modals and banners.
const DISMISS_OVERLAYS_JS: &str = r#"
    (() => {
        const candidates = document.querySelectorAll(
            '[class*="close"], [class*="Close"], [class*="dismiss"], [class*="Dismiss"], ' +
            '[aria-label*="close"], [aria-label*="Close"], [data-dismiss]'
        );
        let clicked = 0;
        candidates.forEach((el) => {
            try { el.click(); clicked += 1; } catch (e) {}
        });
        return clicked;
    })()
"#;

/// Renders search pages in a headless Chrome, one browser per fetch
pub struct RenderedFetcher {
    navigation_timeout: Duration,
    settle_delay: Duration,
    user_agent: String,
}

impl RenderedFetcher {
    pub fn new(config: &FinderConfig) -> Self {
        Self {
            navigation_timeout: config.navigation_timeout(),
            settle_delay: config.settle_delay(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    fn method(&self) -> FetchMethod {
        FetchMethod::Rendered
    }

    async fn fetch(&self, site: &SiteProfile, query: &str) -> Result<String, FinderError> {
        let url = site.build_search_url(query);
        info!("Rendering {} from {}", site.name, url);

        let session = RenderSession {
            url: url.clone(),
            navigation_timeout: self.navigation_timeout,
            settle_delay: self.settle_delay,
            user_agent: self.user_agent.clone(),
        };

        tokio::task::spawn_blocking(move || session.run())
            .await
            .map_err(|e| FinderError::Navigation {
                url,
                reason: format!("browser task failed: {e}"),
            })?
    }
}

/// Everything one blocking browser run needs, moved onto the blocking pool.
struct RenderSession {
    url: String,
    navigation_timeout: Duration,
    settle_delay: Duration,
    user_agent: String,
}

impl RenderSession {
    fn run(self) -> Result<String, FinderError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .idle_browser_timeout(
                self.navigation_timeout + self.settle_delay + Duration::from_secs(30),
            )
            .build()
            .map_err(|e| self.navigation_error(e))?;

        // Dropping the browser kills the Chrome process, on every return path below.
        let browser = Browser::new(options).map_err(|e| self.navigation_error(e))?;
        let tab = browser.new_tab().map_err(|e| self.navigation_error(e))?;
        tab.set_default_timeout(self.navigation_timeout);

        tab.set_user_agent(&self.user_agent, Some(traits::ACCEPT_LANGUAGE), None)
            .map_err(|e| self.navigation_error(e))?;

        let started = Instant::now();
        if let Err(e) = tab.navigate_to(&self.url).and_then(|tab| tab.wait_until_navigated()) {
            if started.elapsed() >= self.navigation_timeout {
                warn!("Navigation to {} timed out", self.url);
                return Err(FinderError::FetchTimeout {
                    url: self.url,
                    timeout_secs: self.navigation_timeout.as_secs(),
                });
            }
            return Err(self.navigation_error(e));
        }

        std::thread::sleep(self.settle_delay);

        match tab.evaluate(DISMISS_OVERLAYS_JS, false) {
            Ok(result) => debug!("Dismissed overlays on {}: {:?}", self.url, result.value),
            Err(e) => debug!("Overlay dismissal failed on {}: {}", self.url, e),
        }

        tab.get_content().map_err(|e| self.navigation_error(e))
    }

    fn navigation_error(&self, e: impl std::fmt::Display) -> FinderError {
        FinderError::Navigation {
            url: self.url.clone(),
            reason: e.to_string(),
        }
    }
}
