//! Event sink a search run reports to.
//!
//! The engine calls the sink synchronously at each phase boundary and never
//! constructs a transport of its own. Implementations must return quickly;
//! the engine does not buffer on their behalf.

use tokio::sync::mpsc;

use partscout_core::{ResolvedPart, SearchResultRow};

/// Receiver of the four notifications a search run produces.
pub trait SearchSink: Send + Sync {
    /// Fired once, before any pricing work, with every resolved part.
    fn parts_resolved(&self, parts: &[ResolvedPart]);

    /// Fired once per dealer, in directory order.
    fn result(&self, row: &SearchResultRow);

    /// Fraction of dealers completed, in `(0, 1]`; fired after each row.
    fn progress(&self, fraction: f64);

    /// Fired exactly once when the run ends, however it ends.
    fn complete(&self);
}

/// Sink that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl SearchSink for NoopSink {
    fn parts_resolved(&self, _parts: &[ResolvedPart]) {}
    fn result(&self, _row: &SearchResultRow) {}
    fn progress(&self, _fraction: f64) {}
    fn complete(&self) {}
}

/// Owned form of a sink notification, for forwarding across tasks.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    PartsResolved(Vec<ResolvedPart>),
    Result(SearchResultRow),
    Progress(f64),
    Complete,
}

/// Sink that forwards every notification into an unbounded channel, for a
/// transport bridge running on another task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SearchEvent>,
}

impl ChannelSink {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SearchEvent) {
        // A dropped receiver means nobody is listening any more; the run
        // itself carries on.
        if self.tx.send(event).is_err() {
            tracing::debug!("search event receiver dropped");
        }
    }
}

impl SearchSink for ChannelSink {
    fn parts_resolved(&self, parts: &[ResolvedPart]) {
        self.send(SearchEvent::PartsResolved(parts.to_vec()));
    }

    fn result(&self, row: &SearchResultRow) {
        self.send(SearchEvent::Result(row.clone()));
    }

    fn progress(&self, fraction: f64) {
        self.send(SearchEvent::Progress(fraction));
    }

    fn complete(&self) {
        self.send(SearchEvent::Complete);
    }
}
