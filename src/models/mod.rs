//! Data models for scraped products and comparison reports

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::traits::FetchMethod;

/// A product listing scraped from one pharmacy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub price_text: String,
    pub link: String,
    pub source: String,
    pub fetch_method: FetchMethod,
}

/// Records found on one source, in document order
pub type SiteResult = Vec<ProductRecord>;

/// Price summary for a source with at least one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStatistics {
    pub count: usize,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
}

/// Aggregated, price-sorted comparison for one query
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub query: String,
    pub method: FetchMethod,
    pub generated_at: DateTime<Utc>,
    pub total_results: usize,
    pub successful_sources: usize,
    pub results: BTreeMap<String, SiteResult>,
    pub top_deals: Vec<ProductRecord>,
    pub statistics: BTreeMap<String, SiteStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Sequential comparisons for several queries
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_results: BTreeMap<String, ComparisonReport>,
    pub processed: usize,
}
