//! Resolution of raw search terms into canonical catalog parts.

use std::collections::HashSet;
use std::pin::pin;

use futures::StreamExt;

use partscout_core::ResolvedPart;

use crate::endpoints::VendorEndpoints;
use crate::error::ScraperError;
use crate::page::{lookup_params_from_link, SearchPage};
use crate::pool::bounded_pool;
use crate::session::SessionClient;

/// Resolves every search term through the vendor's keyword search, at most
/// `concurrency` lookups in flight.
///
/// Terms whose search page has no price-view link are unresolved: they are
/// logged and left out of the result, not reported as errors. Duplicate
/// terms are looked up once. The returned parts are in completion order.
///
/// # Errors
///
/// Returns the first [`ScraperError`] raised by a lookup once its retries
/// are exhausted; the remaining lookups are dropped.
pub async fn resolve_parts(
    client: &SessionClient,
    endpoints: &VendorEndpoints,
    search_terms: &[String],
    concurrency: usize,
) -> Result<Vec<ResolvedPart>, ScraperError> {
    let mut seen = HashSet::new();
    let unique_terms: Vec<&str> = search_terms
        .iter()
        .map(String::as_str)
        .filter(|term| seen.insert(*term))
        .collect();

    let mut outcomes = pin!(bounded_pool(concurrency, unique_terms, |term| {
        resolve_one(client, endpoints, term)
    }));

    let mut resolved = Vec::new();
    while let Some(outcome) = outcomes.next().await {
        if let Some(part) = outcome? {
            resolved.push(part);
        }
    }

    tracing::info!(
        requested = search_terms.len(),
        resolved = resolved.len(),
        "search terms resolved"
    );
    Ok(resolved)
}

/// Looks up one term. `Ok(None)` means the term did not resolve.
async fn resolve_one(
    client: &SessionClient,
    endpoints: &VendorEndpoints,
    search_term: &str,
) -> Result<Option<ResolvedPart>, ScraperError> {
    tracing::debug!(search_term, "resolving search term");
    let url = endpoints.search_url(search_term)?;
    let body = client.get_text(&url, &[]).await?;
    Ok(part_from_search_page(search_term, &body))
}

/// Builds a [`ResolvedPart`] from a keyword search page, or `None` when the
/// page does not link to a price view.
#[must_use]
pub fn part_from_search_page(search_term: &str, html: &str) -> Option<ResolvedPart> {
    let page = SearchPage::parse(html);
    let Some(link) = page.price_link else {
        tracing::warn!(search_term, "could not resolve search term");
        return None;
    };

    let lookup = lookup_params_from_link(&link);
    tracing::debug!(
        search_term,
        sku_id = %lookup.sku_id,
        part_number = %lookup.part_number,
        "resolved search term"
    );

    Some(ResolvedPart {
        search_term: search_term.to_owned(),
        name: page.name,
        detail_url: page.canonical_url,
        package_quantity: page.package_quantity,
        part_number: lookup.part_number.clone(),
        lookup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_RESOLVED: &str = include_str!("../tests/fixtures/search_resolved.html");
    const SEARCH_UNRESOLVED: &str = include_str!("../tests/fixtures/search_unresolved.html");

    #[test]
    fn resolved_page_builds_part() {
        let part = part_from_search_page("fl500s", SEARCH_RESOLVED).expect("should resolve");
        assert_eq!(part.search_term, "fl500s");
        assert_eq!(part.name, "Oil Filter & Gasket Kit");
        assert_eq!(
            part.detail_url,
            "https://parts.ford.com/shop/en/us/oil-filter-fl500s-12345"
        );
        assert_eq!(part.package_quantity, 6);
        assert_eq!(part.part_number, "FL-500-S");
        assert_eq!(part.lookup.part_number, part.part_number);
        assert_eq!(part.lookup.sku_id, "3074457345616792169");
    }

    #[test]
    fn page_without_price_link_is_unresolved() {
        assert!(part_from_search_page("zzqx", SEARCH_UNRESOLVED).is_none());
    }
}
