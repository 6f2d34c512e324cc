pub mod directory;
pub mod endpoints;
pub mod engine;
pub mod error;
pub mod page;
pub mod pool;
pub mod pricing;
pub mod resolver;
pub mod session;
pub mod sink;

mod retry;

pub use directory::fetch_dealerships;
pub use endpoints::VendorEndpoints;
pub use engine::{run_search, search_parts, SearchRequest};
pub use error::ScraperError;
pub use pool::bounded_pool;
pub use pricing::fetch_dealer_prices;
pub use resolver::resolve_parts;
pub use session::SessionClient;
pub use sink::{ChannelSink, NoopSink, SearchEvent, SearchSink};

pub use tokio_util::sync::CancellationToken;
