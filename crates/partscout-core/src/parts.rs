//! Domain records produced by a dealer-price search run.
//!
//! Field names serialize in camelCase so the aggregate written by the CLI
//! matches the JSON shape downstream consumers already read
//! (`resolvedParts`, `searchResults`, `packageQuantity`, ...).

use serde::{Deserialize, Deserializer, Serialize};

/// A resolved geographic point. Zip-to-coordinate lookup happens upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Identifiers the vendor's price view needs to look up one catalog item.
///
/// Parsed from the query string of the canonical price-view link found on the
/// keyword search page. Missing parameters are kept as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupParams {
    /// Vendor `skuID` query parameter.
    pub sku_id: String,
    /// Vendor `mfPartNumber` query parameter.
    pub part_number: String,
    /// Vendor `uniqueID` query parameter.
    pub unique_id: String,
}

/// A search term successfully matched to one canonical catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPart {
    /// The raw search term exactly as the caller supplied it.
    #[serde(rename = "search")]
    pub search_term: String,
    /// Human-readable name, HTML-decoded, trimmed, first `|` segment only.
    pub name: String,
    /// Canonical detail page of the part. Empty when the page omits it.
    #[serde(rename = "url")]
    pub detail_url: String,
    /// Units per package; at least 1.
    pub package_quantity: u32,
    pub part_number: String,
    #[serde(rename = "params")]
    pub lookup: LookupParams,
}

/// A dealership returned by the vendor's store locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dealership {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    /// `NaN` when the directory entry carried no usable coordinate.
    #[serde(deserialize_with = "nan_if_null")]
    pub latitude: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub longitude: f64,
    /// GET-ing this URL selects the dealer context for the current session.
    #[serde(rename = "switchUrl")]
    pub context_switch_url: String,
}

/// Stock classification derived from a vendor inventory message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Available")]
    Available,
    #[serde(rename = "Unavailable")]
    Unavailable,
}

impl Availability {
    /// `true` for every classification except [`Availability::Unavailable`].
    #[must_use]
    pub fn is_available(self) -> bool {
        !matches!(self, Availability::Unavailable)
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::InStock => write!(f, "In Stock"),
            Availability::Available => write!(f, "Available"),
            Availability::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// Price and availability of one resolved part at one dealership.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    #[serde(rename = "search")]
    pub search_term: String,
    /// Dealer price, or `NaN` when the page carried no parseable price.
    /// Serialized as `null` in the NaN case.
    #[serde(deserialize_with = "nan_if_null")]
    pub price: f64,
    pub available: bool,
    pub availability: Availability,
}

impl PriceQuote {
    /// Builds a quote, keeping `available` consistent with `availability`.
    #[must_use]
    pub fn new(search_term: impl Into<String>, price: f64, availability: Availability) -> Self {
        Self {
            search_term: search_term.into(),
            price,
            available: availability.is_available(),
            availability,
        }
    }

    /// The quote recorded when the price page could not be fetched at all.
    #[must_use]
    pub fn missing(search_term: impl Into<String>) -> Self {
        Self::new(search_term, f64::NAN, Availability::Unavailable)
    }

    /// Returns `true` if the vendor page yielded a usable price.
    #[must_use]
    pub fn has_price(&self) -> bool {
        !self.price.is_nan()
    }
}

fn nan_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// All quotes gathered for one dealership, emitted as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultRow {
    pub dealership: Dealership,
    /// Completion order, not request order; correlate by `search_term`.
    pub results: Vec<PriceQuote>,
}

impl SearchResultRow {
    /// Looks up the quote for `search_term` in this row.
    #[must_use]
    pub fn quote_for(&self, search_term: &str) -> Option<&PriceQuote> {
        self.results.iter().find(|q| q.search_term == search_term)
    }
}

/// Terminal value of a completed, non-cancelled run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub resolved_parts: Vec<ResolvedPart>,
    pub search_results: Vec<SearchResultRow>,
}

impl AggregateResult {
    /// Search terms from `requested` that did not resolve to a catalog item,
    /// in the order they were requested.
    #[must_use]
    pub fn unresolved_terms<'a>(&self, requested: &'a [String]) -> Vec<&'a str> {
        requested
            .iter()
            .filter(|term| {
                !self
                    .resolved_parts
                    .iter()
                    .any(|p| &p.search_term == *term)
            })
            .map(String::as_str)
            .collect()
    }
}
