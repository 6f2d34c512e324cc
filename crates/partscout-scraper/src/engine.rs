//! Search orchestration: directory, resolution, then dealer-by-dealer pricing.
//!
//! ```text
//! INIT -> DIRECTORY_FETCHED -> PARTS_RESOLVED
//!      -> for each dealer: SWITCH_CONTEXT -> FETCH_PRICES -> EMIT_ROW -> EMIT_PROGRESS
//!      -> COMPLETE
//! ```
//!
//! The cancellation token is polled only between phases and between dealers.
//! In-flight requests are never interrupted, so a cancel takes effect after
//! at most the work already started at the last checkpoint.

use partscout_core::{AggregateResult, Location};
use tokio_util::sync::CancellationToken;

use crate::directory::fetch_dealerships;
use crate::endpoints::VendorEndpoints;
use crate::error::ScraperError;
use crate::pricing::fetch_dealer_prices;
use crate::resolver::resolve_parts;
use crate::session::SessionClient;
use crate::sink::SearchSink;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_MAX_DEALERSHIPS: u32 = 1_000_000;
pub const DEFAULT_RADIUS_MILES: f64 = 100.0;

/// Inputs of one search run. Validation (non-empty terms, positive radius,
/// a real location) is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Raw search terms; order only matters for reporting.
    pub search_terms: Vec<String>,
    pub radius_miles: f64,
    pub location: Location,
    /// Worker pool size for resolution and per-dealer pricing; at least 1.
    pub concurrency: usize,
    pub max_dealerships: u32,
}

impl SearchRequest {
    /// A request with the default radius, concurrency, and dealer cap.
    #[must_use]
    pub fn new(search_terms: Vec<String>, location: Location) -> Self {
        Self {
            search_terms,
            radius_miles: DEFAULT_RADIUS_MILES,
            location,
            concurrency: DEFAULT_CONCURRENCY,
            max_dealerships: DEFAULT_MAX_DEALERSHIPS,
        }
    }
}

/// Points at which a run looks at its cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Checkpoint {
    BeforeDirectory,
    BeforeResolution,
    BeforePartsResolved,
    BeforeDealer,
}

fn cancelled_at(cancel: &CancellationToken, checkpoint: Checkpoint) -> bool {
    if cancel.is_cancelled() {
        tracing::info!(?checkpoint, "search cancelled");
        true
    } else {
        false
    }
}

/// Runs a search and then fires [`SearchSink::complete`], whether the run
/// finished, was cancelled, or failed.
///
/// `client` must be fresh for this run and not used by any other run while
/// this one is active; its cookie jar carries the dealer context.
///
/// # Errors
///
/// See [`search_parts`].
pub async fn run_search(
    client: &SessionClient,
    endpoints: &VendorEndpoints,
    request: &SearchRequest,
    sink: &dyn SearchSink,
    cancel: &CancellationToken,
) -> Result<Option<AggregateResult>, ScraperError> {
    let outcome = search_parts(client, endpoints, request, sink, cancel).await;
    sink.complete();
    outcome
}

/// Resolves the search terms, then prices them at every dealer in range,
/// one dealer at a time, reporting to `sink` as it goes.
///
/// Returns `Ok(None)` when `cancel` was observed at a checkpoint; the sink
/// has then seen only the events emitted before it. Does not fire
/// [`SearchSink::complete`]; [`run_search`] does.
///
/// # Errors
///
/// Returns a [`ScraperError`] when the directory query, a search-term lookup,
/// or a dealer context switch fails after its retries. Individual price
/// lookups never fail the run.
pub async fn search_parts(
    client: &SessionClient,
    endpoints: &VendorEndpoints,
    request: &SearchRequest,
    sink: &dyn SearchSink,
    cancel: &CancellationToken,
) -> Result<Option<AggregateResult>, ScraperError> {
    if cancelled_at(cancel, Checkpoint::BeforeDirectory) {
        return Ok(None);
    }

    let dealerships = fetch_dealerships(
        client,
        endpoints,
        request.location,
        request.radius_miles,
        request.max_dealerships,
    )
    .await?;

    if cancelled_at(cancel, Checkpoint::BeforeResolution) {
        return Ok(None);
    }

    let concurrency = request.concurrency.max(1);
    let resolved_parts =
        resolve_parts(client, endpoints, &request.search_terms, concurrency).await?;

    if cancelled_at(cancel, Checkpoint::BeforePartsResolved) {
        return Ok(None);
    }
    sink.parts_resolved(&resolved_parts);

    let total = dealerships.len();
    let mut search_results = Vec::with_capacity(total);
    for (index, dealership) in dealerships.iter().enumerate() {
        if cancelled_at(cancel, Checkpoint::BeforeDealer) {
            return Ok(None);
        }

        tracing::info!(
            dealer_id = %dealership.id,
            dealer = %dealership.name,
            position = index + 1,
            total,
            "pricing dealer"
        );
        let row = fetch_dealer_prices(
            client,
            endpoints,
            dealership,
            &resolved_parts,
            concurrency,
        )
        .await?;

        sink.result(&row);
        sink.progress(progress_fraction(index + 1, total));
        search_results.push(row);
    }

    tracing::info!(
        dealers = total,
        parts = resolved_parts.len(),
        "search complete"
    );
    Ok(Some(AggregateResult {
        resolved_parts,
        search_results,
    }))
}

#[allow(clippy::cast_precision_loss)]
fn progress_fraction(completed: usize, total: usize) -> f64 {
    if completed >= total {
        1.0
    } else {
        completed as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction_ends_exactly_at_one() {
        assert!((progress_fraction(1, 3) - 1.0 / 3.0).abs() < 1e-12);
        assert!((progress_fraction(2, 3) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(progress_fraction(3, 3).to_bits(), 1.0f64.to_bits());
    }

    #[test]
    fn search_request_defaults() {
        let request = SearchRequest::new(
            vec!["fl500s".to_owned()],
            Location {
                latitude: 42.0,
                longitude: -83.0,
            },
        );
        assert_eq!(request.concurrency, 10);
        assert_eq!(request.max_dealerships, 1_000_000);
        assert!((request.radius_miles - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn cancelled_before_start_makes_no_requests() {
        // Unroutable origin: any request would fail, so Ok(None) proves none was made.
        let client = SessionClient::new(1, "partscout-test/0.1", "en-US", 0, 0).unwrap();
        let endpoints = VendorEndpoints::new("http://127.0.0.1:1", "1405", "251");
        let request = SearchRequest::new(
            vec!["fl500s".to_owned()],
            Location {
                latitude: 0.0,
                longitude: 0.0,
            },
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = search_parts(&client, &endpoints, &request, &crate::NoopSink, &cancel)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
