use std::collections::BTreeMap;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};

use crate::config::FinderConfig;
use crate::error::FinderError;
use crate::extractor::extract_products;
use crate::fetcher::Fetchers;
use crate::models::{BatchReport, ComparisonReport, ProductRecord, SiteResult, SiteStatistics};
use crate::sites;
use crate::traits::{FetchMethod, SiteProfile};

#[derive(Clone)]
pub struct PriceFinder {
    sites: Vec<SiteProfile>,
    fetchers: Fetchers,
    config: FinderConfig,
}

impl PriceFinder {
    /// Finder over the built-in site registry.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Http`] if the HTTP client cannot be built.
    pub fn new(config: FinderConfig) -> Result<Self, FinderError> {
        let fetchers = Fetchers::from_config(&config)?;
        Ok(Self::with_parts(sites::registry(), fetchers, config))
    }

    pub fn with_parts(sites: Vec<SiteProfile>, fetchers: Fetchers, config: FinderConfig) -> Self {
        Self {
            sites,
            fetchers,
            config,
        }
    }

    /// Search every site concurrently and build a price-sorted comparison.
    ///
    /// A site that fails contributes an empty result and an `errors` entry; it never
    /// affects the other sites.
    pub async fn compare(&self, query: &str, method: FetchMethod) -> ComparisonReport {
        let query = query.trim();
        info!("Comparing prices for '{}' on {} sites ({})", query, self.sites.len(), method);

        let scrapes = self.sites.iter().map(|site| async move {
            let outcome = self.scrape_site(site, query, method).await;
            (site.id.clone(), outcome)
        });
        let outcomes = join_all(scrapes).await;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut errors = BTreeMap::new();
        for (source_id, outcome) in outcomes {
            match outcome {
                Ok(products) => results.push((source_id, products)),
                Err(e) => {
                    warn!("Scraping {} failed: {}", source_id, e);
                    errors.insert(source_id.clone(), e.to_string());
                    results.push((source_id, Vec::new()));
                }
            }
        }

        let report = build_report(query, method, results, errors, &self.config);
        info!(
            "Found {} products for '{}' across {} sources",
            report.total_results, query, report.successful_sources
        );
        report
    }

    /// Compare several queries one after another, pausing between them.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Validation`] before any fetch if the list is empty, too
    /// long, or contains a blank query.
    pub async fn compare_batch(
        &self,
        queries: &[String],
        method: FetchMethod,
    ) -> Result<BatchReport, FinderError> {
        validate_batch(queries, self.config.batch_max_queries)?;

        let mut batch_results = BTreeMap::new();
        for (i, query) in queries.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.batch_delay()).await;
            }
            let report = self.compare(query, method).await;
            batch_results.insert(query.trim().to_string(), report);
        }

        Ok(BatchReport {
            processed: queries.len(),
            batch_results,
        })
    }

    async fn scrape_site(
        &self,
        site: &SiteProfile,
        query: &str,
        method: FetchMethod,
    ) -> Result<Vec<ProductRecord>, FinderError> {
        let fetcher = self.fetchers.for_method(method);
        let html = fetcher.fetch(site, query).await?;
        extract_products(&html, site, fetcher.method(), self.config.max_cards)
    }
}

fn validate_batch(queries: &[String], max: usize) -> Result<(), FinderError> {
    if queries.is_empty() {
        return Err(FinderError::Validation(
            "at least one medicine name is required".to_string(),
        ));
    }
    if queries.len() > max {
        return Err(FinderError::Validation(format!(
            "at most {max} medicine names per batch, got {}",
            queries.len()
        )));
    }
    if queries.iter().any(|q| q.trim().is_empty()) {
        return Err(FinderError::Validation(
            "medicine names must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// Assemble a report from per-source results given in registry order.
fn build_report(
    query: &str,
    method: FetchMethod,
    results: Vec<(String, SiteResult)>,
    errors: BTreeMap<String, String>,
    config: &FinderConfig,
) -> ComparisonReport {
    let mut all_products: Vec<ProductRecord> = results
        .iter()
        .flat_map(|(_, products)| products.iter().cloned())
        .collect();
    // Stable, so equal prices keep source and document order.
    all_products.sort_by(|a, b| a.price.total_cmp(&b.price));
    all_products.truncate(config.top_deals_limit);

    let statistics: BTreeMap<String, SiteStatistics> = results
        .iter()
        .filter_map(|(source_id, products)| {
            compute_statistics(products).map(|stats| (source_id.clone(), stats))
        })
        .collect();

    let total_results: usize = results.iter().map(|(_, products)| products.len()).sum();
    let empty_sources: Vec<&str> = results
        .iter()
        .filter(|(_, products)| products.is_empty())
        .map(|(source_id, _)| source_id.as_str())
        .collect();
    let suggestions =
        derive_suggestions(total_results, method, &empty_sources, config.sparse_threshold);

    ComparisonReport {
        query: query.to_string(),
        method,
        generated_at: Utc::now(),
        total_results,
        successful_sources: statistics.len(),
        results: results.into_iter().collect(),
        top_deals: all_products,
        statistics,
        errors: (!errors.is_empty()).then_some(errors),
        suggestions: (!suggestions.is_empty()).then_some(suggestions),
    }
}

fn compute_statistics(products: &[ProductRecord]) -> Option<SiteStatistics> {
    if products.is_empty() {
        return None;
    }

    let prices = products.iter().map(|p| p.price);
    let min_price = prices.clone().fold(f64::INFINITY, f64::min);
    let max_price = prices.clone().fold(f64::NEG_INFINITY, f64::max);
    let avg = prices.sum::<f64>() / products.len() as f64;

    Some(SiteStatistics {
        count: products.len(),
        min_price,
        max_price,
        avg_price: (avg * 100.0).round() / 100.0,
    })
}

fn derive_suggestions(
    total_results: usize,
    method: FetchMethod,
    empty_sources: &[&str],
    sparse_threshold: usize,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if total_results == 0 {
        suggestions.push(
            "No products found. Check the spelling or try the brand or generic name.".to_string(),
        );
        suggestions.push(format!(
            "Try the {} fetch method instead of {}.",
            method.alternative(),
            method
        ));
    } else if total_results < sparse_threshold {
        suggestions.push(
            "Few products found. Try an alternative spelling, brand, or generic name.".to_string(),
        );
        if method == FetchMethod::Static {
            suggestions.push(
                "Use the rendered fetch method for more complete results.".to_string(),
            );
        }
    }

    if method == FetchMethod::Static && !empty_sources.is_empty() {
        suggestions.push(format!(
            "The rendered fetch method is more reliable for sources that returned nothing: {}.",
            empty_sources.join(", ")
        ));
    }

    suggestions
}
