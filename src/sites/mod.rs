//! Registry of the pharmacy websites searched on every comparison.
//!
//! Sites are plain data: adding a source means adding a profile here, no new code.
//! The primary selectors target each site's current markup; the fallback selectors
//! are looser attribute matches that survive most class-name churn.

use crate::traits::{SiteProfile, SiteSelectors};

/// All configured sources, in report order
pub fn registry() -> Vec<SiteProfile> {
    vec![
        SiteProfile {
            id: "1mg".to_string(),
            name: "Tata 1mg".to_string(),
            base_url: "https://www.1mg.com".to_string(),
            search_url_pattern: "https://www.1mg.com/search/all?name={query}".to_string(),
            primary: SiteSelectors::new(
                "div[class*='style__product-box'], div[class*='style__horizontal-card']",
                &[
                    "div[class*='style__pro-title']",
                    "span[class*='style__pro-title']",
                ],
                &[
                    "div[class*='style__price-tag']",
                    "div[class*='style__discount-price']",
                ],
                &["a[href*='/drugs/']", "a[href*='/otc/']", "a"],
            ),
            fallback: SiteSelectors::new(
                "[class*='product-card'], [class*='ProductCard'], [data-testid*='product']",
                &["[class*='title']", "[class*='name']"],
                &["[class*='price']"],
                &["a"],
            ),
        },
        SiteProfile {
            id: "pharmeasy".to_string(),
            name: "PharmEasy".to_string(),
            base_url: "https://pharmeasy.in".to_string(),
            search_url_pattern: "https://pharmeasy.in/search/all?name={query}".to_string(),
            primary: SiteSelectors::new(
                "div[class*='ProductCard_medicineUnitWrapper'], div[class*='Search_medicineLists']",
                &[
                    "h1[class*='ProductCard_medicineName']",
                    "[class*='ProductCard_medicineName']",
                ],
                &[
                    "div[class*='ProductCard_ourPrice']",
                    "span[class*='ProductCard_gcdDiscountContainer']",
                ],
                &["a[class*='ProductCard_medicineUnitContainer']", "a"],
            ),
            fallback: SiteSelectors::new(
                "[class*='medicineUnit'], [class*='ProductCard']",
                &["[class*='medicineName']", "[class*='name']"],
                &["[class*='Price']", "[class*='price']"],
                &["a"],
            ),
        },
        SiteProfile {
            id: "netmeds".to_string(),
            name: "Netmeds".to_string(),
            base_url: "https://www.netmeds.com".to_string(),
            search_url_pattern: "https://www.netmeds.com/catalogsearch/result/{query}/all"
                .to_string(),
            primary: SiteSelectors::new(
                "div.cat-item, div.product-list .ais-InfiniteHits-item",
                &["h3.clsgetname", ".cat-item .info a"],
                &["span.final-price", "#final_price"],
                &["a.category_name", "a"],
            ),
            fallback: SiteSelectors::new(
                "[class*='product-item'], [class*='drug_list'] li",
                &["[class*='name']", "h3"],
                &["[class*='price']"],
                &["a"],
            ),
        },
        SiteProfile {
            id: "apollo".to_string(),
            name: "Apollo Pharmacy".to_string(),
            base_url: "https://www.apollopharmacy.in".to_string(),
            search_url_pattern: "https://www.apollopharmacy.in/search-medicines/{query}"
                .to_string(),
            primary: SiteSelectors::new(
                "div[class*='ProductCard_productCard'], div[class*='ProductCard_pdHeader']",
                &[
                    "h2[class*='ProductCard_productName']",
                    "p[class*='ProductCard_productName']",
                ],
                &[
                    "p[class*='ProductCard_priceGroup']",
                    "span[class*='ProductCard_price']",
                ],
                &["a[href*='/otc/']", "a[href*='/medicine/']", "a"],
            ),
            fallback: SiteSelectors::new(
                "[class*='productCard'], [class*='ProductCard']",
                &["[class*='productName']", "[class*='name']"],
                &["[class*='price']", "[class*='Price']"],
                &["a"],
            ),
        },
    ]
}
