use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, redirect};
use tracing::{info, warn};

use crate::config::FinderConfig;
use crate::error::FinderError;
use crate::traits::{self, FetchMethod, PageFetcher, SiteProfile};

/// Fetches search pages with a plain HTTP GET
pub struct StaticFetcher {
    client: Client,
    timeout_secs: u64,
}

impl StaticFetcher {
    /// # Errors
    ///
    /// Returns [`FinderError::Http`] if the client cannot be built.
    pub fn new(config: &FinderConfig) -> Result<Self, FinderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(traits::ACCEPT_LANGUAGE));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.http_timeout())
            // reqwest counts the original URL as a previous hop.
            .redirect(redirect::Policy::limited(config.max_redirects + 1))
            .build()?;

        Ok(Self {
            client,
            timeout_secs: config.http_timeout_secs,
        })
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    fn method(&self) -> FetchMethod {
        FetchMethod::Static
    }

    async fn fetch(&self, site: &SiteProfile, query: &str) -> Result<String, FinderError> {
        let url = site.build_search_url(query);
        info!("Fetching {} from {}", site.name, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(e, &url))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            warn!("{} blocked the request with HTTP {}", site.name, status.as_u16());
            return Err(FinderError::FetchBlocked {
                source_id: site.id.clone(),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(FinderError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        response.text().await.map_err(|e| self.request_error(e, &url))
    }
}

impl StaticFetcher {
    fn request_error(&self, e: reqwest::Error, url: &str) -> FinderError {
        if e.is_timeout() {
            FinderError::FetchTimeout {
                url: url.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            FinderError::Http(e)
        }
    }
}
