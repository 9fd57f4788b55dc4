//! Page retrieval strategies.
//!
//! [`StaticFetcher`] issues a plain GET and returns the server's HTML. [`RenderedFetcher`]
//! drives a headless Chrome so client-side listings are present in the returned DOM.
//! Both return raw HTML for the extractor, so callers pick one by [`FetchMethod`].

mod browser;
mod http;

pub use browser::RenderedFetcher;
pub use http::StaticFetcher;

use std::sync::Arc;

use crate::config::FinderConfig;
use crate::error::FinderError;
use crate::traits::{FetchMethod, PageFetcher};

/// One fetcher per method
#[derive(Clone)]
pub struct Fetchers {
    static_fetcher: Arc<dyn PageFetcher>,
    rendered_fetcher: Arc<dyn PageFetcher>,
}

impl Fetchers {
    /// # Errors
    ///
    /// Returns [`FinderError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &FinderConfig) -> Result<Self, FinderError> {
        Ok(Self::new(
            Arc::new(StaticFetcher::new(config)?),
            Arc::new(RenderedFetcher::new(config)),
        ))
    }

    pub fn new(
        static_fetcher: Arc<dyn PageFetcher>,
        rendered_fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            static_fetcher,
            rendered_fetcher,
        }
    }

    pub fn for_method(&self, method: FetchMethod) -> &Arc<dyn PageFetcher> {
        match method {
            FetchMethod::Static => &self.static_fetcher,
            FetchMethod::Rendered => &self.rendered_fetcher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_fetcher_by_method() {
        let fetchers = Fetchers::from_config(&FinderConfig::default()).unwrap();
        assert_eq!(fetchers.for_method(FetchMethod::Static).method(), FetchMethod::Static);
        assert_eq!(fetchers.for_method(FetchMethod::Rendered).method(), FetchMethod::Rendered);
    }
}
