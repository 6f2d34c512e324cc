//! Per-dealer pricing of resolved parts.
//!
//! The vendor keeps the selected dealer in the session cookie, so a dealer's
//! prices are only valid between its context switch and the next dealer's.
//! Callers must therefore price dealers one at a time on a given
//! [`SessionClient`]; only the price lookups within one dealer run
//! concurrently.

use std::pin::pin;

use futures::StreamExt;

use partscout_core::{Dealership, PriceQuote, ResolvedPart, SearchResultRow};

use crate::endpoints::VendorEndpoints;
use crate::error::ScraperError;
use crate::page::PricePage;
use crate::pool::bounded_pool;
use crate::session::SessionClient;

/// Switches the session to `dealership` and prices every part under that
/// context, at most `concurrency` lookups in flight.
///
/// A price lookup that fails after its retries does not fail the dealer: the
/// part is recorded with a `NaN` price and as unavailable, and the failure
/// is logged. Quotes are in completion order.
///
/// # Errors
///
/// Returns the [`ScraperError`] of the context-switch request once its
/// retries are exhausted. Without a dealer context no price is meaningful.
pub async fn fetch_dealer_prices(
    client: &SessionClient,
    endpoints: &VendorEndpoints,
    dealership: &Dealership,
    parts: &[ResolvedPart],
    concurrency: usize,
) -> Result<SearchResultRow, ScraperError> {
    client
        .get_text(&dealership.context_switch_url, &[])
        .await?;
    tracing::debug!(dealer_id = %dealership.id, "dealer context selected");

    let mut quotes = pin!(bounded_pool(concurrency, parts, |part| {
        quote_part(client, endpoints, part)
    }));

    let mut results = Vec::with_capacity(parts.len());
    while let Some(quote) = quotes.next().await {
        tracing::debug!(
            dealer_id = %dealership.id,
            search_term = %quote.search_term,
            price = quote.price,
            available = quote.available,
            "price quote"
        );
        results.push(quote);
    }

    Ok(SearchResultRow {
        dealership: dealership.clone(),
        results,
    })
}

async fn quote_part(
    client: &SessionClient,
    endpoints: &VendorEndpoints,
    part: &ResolvedPart,
) -> PriceQuote {
    match fetch_price_page(client, endpoints, part).await {
        Ok(html) => {
            let page = PricePage::parse(&html);
            PriceQuote::new(part.search_term.as_str(), page.price, page.availability)
        }
        Err(err) => {
            tracing::warn!(
                search_term = %part.search_term,
                error = %err,
                "price lookup failed, recording part as unpriced"
            );
            PriceQuote::missing(part.search_term.as_str())
        }
    }
}

async fn fetch_price_page(
    client: &SessionClient,
    endpoints: &VendorEndpoints,
    part: &ResolvedPart,
) -> Result<String, ScraperError> {
    let url = endpoints.price_url(&part.lookup)?;
    client.get_text(&url, &[]).await
}
