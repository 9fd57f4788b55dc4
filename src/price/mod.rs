//! Price text parsing

use std::sync::LazyLock;

use regex::Regex;

/// Optional currency marker, digit groups separated by commas, optional two-digit fraction.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\p{Sc}|Rs\.?|INR)?\s*(\d+(?:,\d+)*(?:\.\d{2})?)").expect("valid regex")
});

/// Extract the first price from free-form text.
///
/// Thousands separators are stripped before conversion. Returns `None` when no digit
/// sequence is present or when the value is not positive, so callers never see a
/// zero price.
pub fn parse_price(text: &str) -> Option<f64> {
    let caps = PRICE_RE.captures(text)?;
    let digits = caps.get(1)?.as_str().replace(',', "");
    let value: f64 = digits.parse().ok()?;

    (value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rupee_with_grouping_and_fraction() {
        assert_eq!(parse_price("₹1,299.50"), Some(1299.50));
    }

    #[test]
    fn parses_bare_integer() {
        assert_eq!(parse_price("1299"), Some(1299.0));
    }

    #[test]
    fn parses_other_currency_symbols() {
        assert_eq!(parse_price("$12.99"), Some(12.99));
        assert_eq!(parse_price("€ 7"), Some(7.0));
        assert_eq!(parse_price("Rs. 2,45,000"), Some(245_000.0));
    }

    #[test]
    fn takes_first_price_in_surrounding_text() {
        assert_eq!(parse_price("MRP ₹450.00 ₹399.00"), Some(450.0));
        assert_eq!(parse_price("  Price: ₹89  "), Some(89.0));
    }

    #[test]
    fn single_digit_fraction_is_not_a_fraction() {
        assert_eq!(parse_price("₹45.5"), Some(45.0));
    }

    #[test]
    fn text_without_digits_is_no_price() {
        assert_eq!(parse_price("Out of stock"), None);
        assert_eq!(parse_price("₹"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn zero_is_no_price() {
        assert_eq!(parse_price("₹0"), None);
        assert_eq!(parse_price("0.00"), None);
    }
}
