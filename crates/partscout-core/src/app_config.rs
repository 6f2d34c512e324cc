/// Runtime settings for a search run, loaded from `PARTSCOUT_*` env vars.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Vendor site origin, e.g. `"https://parts.ford.com"`.
    pub base_url: String,
    pub store_id: String,
    pub catalog_id: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Worker pool size for both resolution and pricing. Always at least 1.
    pub concurrency: usize,
    pub max_dealerships: u32,
    pub radius_miles: f64,
    pub user_agent: String,
    pub accept_language: String,
}
