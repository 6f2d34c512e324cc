//! Field extraction from vendor HTML pages.
//!
//! Pure functions over page text: no I/O, no logging. A field that is missing
//! or malformed falls back to its documented default instead of erroring, so
//! a change in the vendor's markup degrades results rather than aborting a
//! run. The golden fixtures under `tests/fixtures/` pin the markup these
//! patterns were written against.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use partscout_core::{Availability, LookupParams};

use crate::endpoints::PRICE_VIEW_PATH;

static PRICE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    let path = regex::escape(PRICE_VIEW_PATH);
    Regex::new(&format!(r#"https?://[^'"\s<>/]+{path}[^'"\s<>]+"#)).expect("valid regex")
});
static CANONICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link rel="canonical" href="([^"]+)""#).expect("valid regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>([^<]*)</").expect("valid regex"));
static PACKAGE_QTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Package Quantity:&nbsp;\s*(\d+)").expect("valid regex"));
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<h2 id="yourPrice">([^<]*)</h2>"#).expect("valid regex"));
static INVENTORY_MSG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"inventoryMsg\s*:\s*([^\n]*)").expect("valid regex"));

/// Inventory message shown when the selected dealer has the part on hand.
pub const IN_STOCK_MESSAGE: &str =
    "In stock for pickup at dealership, or will ship next business day";
/// Inventory message shown when the part ships from a distribution center.
pub const AVAILABLE_MESSAGE: &str = "Most parts available next business day.";

/// Fields pulled from a keyword search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Link to the price view of the matched part. `None` means the search
    /// term did not resolve.
    pub price_link: Option<String>,
    pub canonical_url: String,
    pub name: String,
    pub package_quantity: u32,
}

impl SearchPage {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            price_link: extract_price_link(html),
            canonical_url: extract_canonical_url(html),
            name: extract_part_name(html),
            package_quantity: extract_package_quantity(html),
        }
    }
}

/// Fields pulled from a price view rendered under a dealer context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePage {
    /// `NaN` when the page shows no parseable price.
    pub price: f64,
    pub availability: Availability,
}

impl PricePage {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            price: extract_price(html),
            availability: classify_availability(&extract_inventory_message(html)),
        }
    }
}

/// First absolute link to the price view, HTML entities decoded.
#[must_use]
pub fn extract_price_link(html: &str) -> Option<String> {
    PRICE_LINK_RE
        .find(html)
        .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
}

/// Target of `<link rel="canonical">`, or empty.
#[must_use]
pub fn extract_canonical_url(html: &str) -> String {
    CANONICAL_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
        .unwrap_or_default()
}

/// Page title up to the first `|`, entity-decoded and trimmed; empty when
/// the page has no title.
#[must_use]
pub fn extract_part_name(html: &str) -> String {
    let Some(title) = TITLE_RE.captures(html).and_then(|cap| cap.get(1)) else {
        return String::new();
    };
    let first_segment = title.as_str().split('|').next().unwrap_or_default();
    html_escape::decode_html_entities(first_segment.trim())
        .trim()
        .to_owned()
}

/// Units per package; `1` when the page omits it or states zero.
#[must_use]
pub fn extract_package_quantity(html: &str) -> u32 {
    PACKAGE_QTY_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map_or(1, |qty| qty.max(1))
}

/// Reads `skuID`, `mfPartNumber`, and `uniqueID` from a price-view link.
/// Absent parameters, or an unparseable link, yield empty strings.
#[must_use]
pub fn lookup_params_from_link(link: &str) -> LookupParams {
    let mut params = LookupParams {
        sku_id: String::new(),
        part_number: String::new(),
        unique_id: String::new(),
    };
    let Ok(url) = Url::parse(link) else {
        return params;
    };
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "skuID" => params.sku_id = value.into_owned(),
            "mfPartNumber" => params.part_number = value.into_owned(),
            "uniqueID" => params.unique_id = value.into_owned(),
            _ => {}
        }
    }
    params
}

/// Dealer price from the `yourPrice` heading, or `NaN`.
#[must_use]
pub fn extract_price(html: &str) -> f64 {
    PRICE_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map_or(f64::NAN, |m| parse_price_text(m.as_str()))
}

/// Parses display text such as `"$1,234.56"` by dropping every character
/// that is not an ASCII digit or `.`. Anything left that is not a number
/// (including nothing at all) yields `NaN`.
#[must_use]
pub fn parse_price_text(text: &str) -> f64 {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().unwrap_or(f64::NAN)
}

/// Text following `inventoryMsg:` up to the end of the line, trimmed.
#[must_use]
pub fn extract_inventory_message(html: &str) -> String {
    INVENTORY_MSG_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .unwrap_or_default()
}

/// Exact-match classification against the known in-stock phrases.
#[must_use]
pub fn classify_availability(message: &str) -> Availability {
    match message {
        IN_STOCK_MESSAGE => Availability::InStock,
        AVAILABLE_MESSAGE => Availability::Available,
        _ => Availability::Unavailable,
    }
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
