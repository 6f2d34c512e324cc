pub mod app_config;
pub mod config;
pub mod parts;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use parts::{
    AggregateResult, Availability, Dealership, Location, LookupParams, PriceQuote, ResolvedPart,
    SearchResultRow,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
