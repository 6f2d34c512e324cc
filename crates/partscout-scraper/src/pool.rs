//! Bounded worker pool shared by the resolution and pricing phases.

use std::future::Future;

use futures::stream::{self, Stream, StreamExt};

/// Runs `worker` over `items` with at most `concurrency` futures in flight.
///
/// Items are pulled from the queue in order; as soon as one in-flight future
/// finishes the next item starts. The returned stream is lazy (nothing runs
/// until it is polled) and yields outputs in completion order, so callers
/// must correlate results by a key carried in the output, never by position.
///
/// A `concurrency` of zero is treated as one.
pub fn bounded_pool<I, F, Fut>(
    concurrency: usize,
    items: I,
    worker: F,
) -> impl Stream<Item = Fut::Output>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future,
{
    stream::iter(items)
        .map(worker)
        .buffer_unordered(concurrency.max(1))
}
