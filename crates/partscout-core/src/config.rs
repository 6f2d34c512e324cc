use crate::app_config::AppConfig;
use crate::ConfigError;

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let base_url = or_default("PARTSCOUT_BASE_URL", "https://parts.ford.com")
        .trim_end_matches('/')
        .to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "PARTSCOUT_BASE_URL",
            format!("expected an http(s) origin, got \"{base_url}\""),
        ));
    }

    let store_id = or_default("PARTSCOUT_STORE_ID", "1405");
    let catalog_id = or_default("PARTSCOUT_CATALOG_ID", "251");
    let log_level = or_default("PARTSCOUT_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("PARTSCOUT_REQUEST_TIMEOUT_SECS", "20")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "PARTSCOUT_REQUEST_TIMEOUT_SECS",
            "must be at least 1 second".to_string(),
        ));
    }
    let max_retries = parse_u32("PARTSCOUT_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("PARTSCOUT_RETRY_BACKOFF_BASE_MS", "100")?;

    let concurrency = parse_usize("PARTSCOUT_CONCURRENCY", "10")?;
    if concurrency == 0 {
        return Err(invalid(
            "PARTSCOUT_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }

    let max_dealerships = parse_u32("PARTSCOUT_MAX_DEALERSHIPS", "1000000")?;

    let radius_raw = or_default("PARTSCOUT_RADIUS_MILES", "100");
    let radius_miles = radius_raw
        .parse::<f64>()
        .map_err(|e| invalid("PARTSCOUT_RADIUS_MILES", e.to_string()))?;
    if !(radius_miles.is_finite() && radius_miles > 0.0) {
        return Err(invalid(
            "PARTSCOUT_RADIUS_MILES",
            format!("must be a positive number, got {radius_raw}"),
        ));
    }

    let user_agent = or_default("PARTSCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let accept_language = or_default("PARTSCOUT_ACCEPT_LANGUAGE", "en-US,en;q=0.9");

    Ok(AppConfig {
        base_url,
        store_id,
        catalog_id,
        log_level,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        concurrency,
        max_dealerships,
        radius_miles,
        user_agent,
        accept_language,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
