//! Retry with exponential back-off and jitter for vendor requests.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). Everything else is
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound for a single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`ScraperError::Http`]: connection reset, timeout, truncated body.
///   Request-builder errors are excluded; they fail identically every time.
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
///
/// **Not retriable:**
/// - 4xx statuses other than 429.
/// - [`ScraperError::Deserialize`]: malformed response; retrying won't fix it.
/// - [`ScraperError::InvalidUrl`]: caller bug.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(e) => !e.is_builder(),
        ScraperError::RateLimited { .. } => true,
        ScraperError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        ScraperError::Deserialize { .. } | ScraperError::InvalidUrl { .. } => false,
    }
}

/// Sleep before retry number `retry` (1-based): `base * 2^(retry - 1)`,
/// capped at [`MAX_DELAY_MS`], then scaled by a random factor in `[0.75, 1.25)`.
fn backoff_delay(backoff_base_ms: u64, retry: u32) -> Duration {
    let exponent = retry.saturating_sub(1).min(20);
    let capped = backoff_base_ms
        .saturating_mul(1u64 << exponent)
        .min(MAX_DELAY_MS);
    let factor = rand::random_range(0.75..1.25);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * factor) as u64;
    Duration::from_millis(jittered)
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// `max_retries` retries have been spent. The last error is returned.
///
/// With `max_retries = 3` and `backoff_base_ms = 100` the request is sent at
/// most 4 times, sleeping roughly 100, 200 and 400 ms in between.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries == max_retries || !is_retriable(&err) {
            return Err(err);
        }

        retries += 1;
        let delay = backoff_delay(backoff_base_ms, retries);
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            url = err.url().unwrap_or("<unknown>"),
            error = %err,
            "transient vendor error, retrying after back-off"
        );
        tokio::time::sleep(delay).await;
    }
}
