//! Traits and interfaces for site-agnostic price lookups

use std::fmt;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::Serialize;

use crate::error::FinderError;

/// Desktop browser user agent sent by both fetch strategies unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Configuration for one pharmacy website
#[derive(Debug, Clone, Serialize)]
pub struct SiteProfile {
    /// Stable identifier used as the key in reports
    pub id: String,
    /// Display name for the website
    pub name: String,
    /// Base URL used to absolutize relative product links
    pub base_url: String,
    /// Search URL pattern with {query} placeholder
    pub search_url_pattern: String,
    /// Selectors tried first
    #[serde(skip)]
    pub primary: SiteSelectors,
    /// Selectors tried when the primary set finds nothing usable
    #[serde(skip)]
    pub fallback: SiteSelectors,
}

/// CSS selectors for the parts of a product listing.
///
/// `product_card` is one selector group whose matches are taken in document order.
/// The other fields are candidate lists tried in order; the first candidate that
/// yields a value wins, wherever it sits in the card.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Container selector for individual products
    pub product_card: String,
    /// Name candidates within product container
    pub name: Vec<String>,
    /// Price candidates within product container
    pub price: Vec<String>,
    /// Product link candidates within product container
    pub link: Vec<String>,
}

impl SiteSelectors {
    pub fn new(product_card: &str, name: &[&str], price: &[&str], link: &[&str]) -> Self {
        let owned = |candidates: &[&str]| -> Vec<String> {
            candidates.iter().map(|s| (*s).to_string()).collect()
        };
        Self {
            product_card: product_card.to_string(),
            name: owned(name),
            price: owned(price),
            link: owned(link),
        }
    }
}

impl SiteProfile {
    /// Build the search URL for a query
    ///
    /// # Arguments
    /// * `query` - The term to search for
    ///
    /// # Returns
    /// * `String` - The complete search URL
    pub fn build_search_url(&self, query: &str) -> String {
        let encoded_term = urlencoding::encode(query.trim());
        self.search_url_pattern.replace("{query}", &encoded_term)
    }
}

/// How a page is retrieved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    /// Plain HTTP GET, no script execution
    #[default]
    #[value(alias = "axios")]
    Static,
    /// Headless browser render
    #[value(alias = "puppeteer")]
    Rendered,
}

impl FetchMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchMethod::Static => "static",
            FetchMethod::Rendered => "rendered",
        }
    }

    /// The other strategy, suggested when this one comes back empty.
    pub fn alternative(self) -> Self {
        match self {
            FetchMethod::Static => FetchMethod::Rendered,
            FetchMethod::Rendered => FetchMethod::Static,
        }
    }
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for page retrieval strategies
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// The strategy this fetcher implements
    fn method(&self) -> FetchMethod;

    /// Fetch the search results page for a query on one site
    ///
    /// # Arguments
    /// * `site` - The site to search
    /// * `query` - The term to search for
    ///
    /// # Returns
    /// * `Result<String, FinderError>` - Page HTML or fetch error
    async fn fetch(&self, site: &SiteProfile, query: &str) -> Result<String, FinderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteProfile {
        let selectors = SiteSelectors::new(".card", &[".name"], &[".price"], &["a"]);
        SiteProfile {
            id: "demo".to_string(),
            name: "Demo".to_string(),
            base_url: "https://demo.example".to_string(),
            search_url_pattern: "https://demo.example/search?name={query}".to_string(),
            primary: selectors.clone(),
            fallback: selectors,
        }
    }

    #[test]
    fn build_search_url_encodes_query() {
        assert_eq!(
            site().build_search_url(" dolo 650 "),
            "https://demo.example/search?name=dolo%20650"
        );
    }

    #[test]
    fn fetch_method_accepts_legacy_names() {
        assert_eq!(FetchMethod::from_str("axios", true), Ok(FetchMethod::Static));
        assert_eq!(FetchMethod::from_str("Puppeteer", true), Ok(FetchMethod::Rendered));
        assert!(FetchMethod::from_str("curl", true).is_err());
    }

    #[test]
    fn fetch_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FetchMethod::Rendered).unwrap(),
            "\"rendered\""
        );
        assert_eq!(FetchMethod::Static.to_string(), "static");
    }

    #[test]
    fn alternative_swaps_method() {
        assert_eq!(FetchMethod::Static.alternative(), FetchMethod::Rendered);
        assert_eq!(FetchMethod::Rendered.alternative(), FetchMethod::Static);
    }
}
