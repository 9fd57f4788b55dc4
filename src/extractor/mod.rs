//! Product extraction from fetched search pages

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, trace};

use crate::error::FinderError;
use crate::models::ProductRecord;
use crate::price::parse_price;
use crate::traits::{FetchMethod, SiteProfile, SiteSelectors};

/// Tried in order when a profile's name selector finds no text.
static GENERIC_NAME_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    parse_static(&[
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "[class*='name']",
        "[class*='Name']",
        "[class*='title']",
        "[class*='Title']",
    ])
});

/// Tried in order when a profile's price selector finds no text.
static GENERIC_PRICE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    parse_static(&[
        "[class*='price']",
        "[class*='Price']",
        "[class*='amount']",
        "[class*='Amount']",
        "[class*='cost']",
        "[class*='mrp']",
        "[class*='MRP']",
    ])
});

static ANY_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

fn parse_static(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
}

/// Hrefs with these prefixes never lead to a product page.
const NON_NAVIGABLE_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:", "data:"];

struct CompiledSelectors {
    product_card: Selector,
    name: Vec<Selector>,
    price: Vec<Selector>,
    link: Vec<Selector>,
}

impl CompiledSelectors {
    fn compile(selectors: &SiteSelectors) -> Result<Self, FinderError> {
        Ok(Self {
            product_card: compile(&selectors.product_card)?,
            name: compile_all(&selectors.name)?,
            price: compile_all(&selectors.price)?,
            link: compile_all(&selectors.link)?,
        })
    }
}

fn compile_all(candidates: &[String]) -> Result<Vec<Selector>, FinderError> {
    candidates.iter().map(|css| compile(css)).collect()
}

fn compile(css: &str) -> Result<Selector, FinderError> {
    Selector::parse(css).map_err(|e| FinderError::InvalidSelector {
        selector: css.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Extract product records from a search results page.
///
/// The primary profile is used when its card selector matches; otherwise, or when
/// none of its cards yield a usable record, the fallback profile is tried. At most
/// `max_cards` cards are inspected per profile.
///
/// # Errors
///
/// Returns [`FinderError::InvalidSelector`] if a profile selector does not parse.
pub fn extract_products(
    html: &str,
    site: &SiteProfile,
    method: FetchMethod,
    max_cards: usize,
) -> Result<Vec<ProductRecord>, FinderError> {
    let primary = CompiledSelectors::compile(&site.primary)?;
    let fallback = CompiledSelectors::compile(&site.fallback)?;

    let document = Html::parse_document(html);

    let primary_cards = document.select(&primary.product_card).count();
    if primary_cards > 0 {
        let products = extract_with_profile(&document, &primary, site, method, max_cards);
        if !products.is_empty() {
            info!(
                "Extracted {} products from {} (primary selectors)",
                products.len(),
                site.name
            );
            return Ok(products);
        }
        debug!(
            "{} primary cards on {} produced no products, trying fallback selectors",
            primary_cards, site.name
        );
    }

    if document.select(&fallback.product_card).next().is_none() {
        debug!("No product cards matched on {}", site.name);
        return Ok(Vec::new());
    }

    let products = extract_with_profile(&document, &fallback, site, method, max_cards);
    info!(
        "Extracted {} products from {} (fallback selectors)",
        products.len(),
        site.name
    );
    Ok(products)
}

fn extract_with_profile(
    document: &Html,
    selectors: &CompiledSelectors,
    site: &SiteProfile,
    method: FetchMethod,
    max_cards: usize,
) -> Vec<ProductRecord> {
    let mut products = Vec::new();

    for card in document.select(&selectors.product_card).take(max_cards) {
        let Some(name) = first_text(card, &selectors.name, &GENERIC_NAME_SELECTORS) else {
            trace!("Skipping card on {} without a name", site.name);
            continue;
        };

        let Some(price_text) = first_text(card, &selectors.price, &GENERIC_PRICE_SELECTORS)
        else {
            trace!("Skipping {} on {} without a price", name, site.name);
            continue;
        };

        let Some(price) = parse_price(&price_text) else {
            trace!(
                "Skipping {} on {}: unparsable price {:?}",
                name, site.name, price_text
            );
            continue;
        };

        let link = resolve_link(card, &selectors.link)
            .map(|href| absolutize(&site.base_url, &href))
            .unwrap_or_default();

        let identity = if link.is_empty() { &name } else { &link };
        let id = format!("{:x}", md5::compute(format!("{}:{}", site.id, identity)));

        products.push(ProductRecord {
            id,
            name,
            price,
            price_text,
            link,
            source: site.id.clone(),
            fetch_method: method,
        });
    }

    products
}

/// Whitespace-collapsed text from the first candidate, then the first generic
/// selector, that matches an element with non-empty text.
fn first_text(
    card: ElementRef<'_>,
    candidates: &[Selector],
    generic: &[Selector],
) -> Option<String> {
    candidates.iter().chain(generic).find_map(|selector| {
        card.select(selector).find_map(|el| {
            let text = el.text().collect::<Vec<_>>().join(" ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!text.is_empty()).then_some(text)
        })
    })
}

fn resolve_link(card: ElementRef<'_>, candidates: &[Selector]) -> Option<String> {
    let href_of = |el: ElementRef<'_>| {
        el.value()
            .attr("href")
            .map(str::trim)
            .filter(|href| is_navigable(href))
            .map(str::to_string)
    };

    candidates
        .iter()
        .chain(std::iter::once(&*ANY_LINK))
        .find_map(|selector| card.select(selector).find_map(href_of))
        .or_else(|| {
            if card.value().name() == "a" {
                href_of(card)
            } else {
                None
            }
        })
}

fn is_navigable(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    !href.is_empty()
        && !NON_NAVIGABLE_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
}

/// Convert a possibly relative href into an absolute URL on `base_url`.
pub fn absolutize(base_url: &str, href: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{href}")
    }
}
