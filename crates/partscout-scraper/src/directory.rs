//! Dealer directory: one store-locator query turned into ordered
//! [`Dealership`] records.
//!
//! ## Observed response shape
//!
//! The locator answers with a JSON object whose `PhysicalStore` array holds
//! one entry per dealer, nearest first. The array is omitted entirely when no
//! dealer is in range. Coordinates arrive as numeric strings on most entries
//! and as bare numbers on a few; postal codes and phone numbers are padded
//! with whitespace. The display name lives in `Description[0].displayStoreName`.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use partscout_core::{Dealership, Location};

use crate::endpoints::VendorEndpoints;
use crate::error::ScraperError;
use crate::session::SessionClient;

/// Top-level store-locator response.
#[derive(Debug, Deserialize)]
pub struct DirectoryResponse {
    #[serde(rename = "PhysicalStore", default)]
    pub physical_store: Vec<RawStore>,
}

/// One `PhysicalStore` entry, kept loose: every field is optional and the
/// id and coordinates may be strings or numbers.
#[derive(Debug, Deserialize)]
pub struct RawStore {
    #[serde(rename = "uniqueID")]
    pub unique_id: Option<Value>,
    pub city: Option<String>,
    #[serde(rename = "stateOrProvinceName")]
    pub state: Option<String>,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
    #[serde(rename = "telephone1")]
    pub phone: Option<String>,
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    #[serde(rename = "Description", default)]
    pub description: Vec<RawDescription>,
}

#[derive(Debug, Deserialize)]
pub struct RawDescription {
    #[serde(rename = "displayStoreName")]
    pub display_store_name: Option<String>,
}

/// Queries the store locator around `location` and returns the dealers in
/// the order the vendor listed them.
///
/// # Errors
///
/// - Any [`SessionClient::issue`] error once retries are exhausted.
/// - [`ScraperError::Deserialize`] if the body is not the locator's JSON shape.
/// - [`ScraperError::InvalidUrl`] if the endpoint URLs cannot be built.
pub async fn fetch_dealerships(
    client: &SessionClient,
    endpoints: &VendorEndpoints,
    location: Location,
    radius_miles: f64,
    max_dealerships: u32,
) -> Result<Vec<Dealership>, ScraperError> {
    let url = endpoints.directory_url(location, radius_miles, max_dealerships)?;
    let response: DirectoryResponse = client
        .get_json(
            &url,
            &format!(
                "store locator at ({}, {})",
                location.latitude, location.longitude
            ),
        )
        .await?;

    let dealerships = dealerships_from_response(response, endpoints)?;
    tracing::info!(
        dealers = dealerships.len(),
        radius_miles,
        "dealer directory fetched"
    );
    Ok(dealerships)
}

/// Maps a locator response to dealerships, trimming text fields and deriving
/// each context-switch URL.
///
/// Entries without an id are dropped, as are repeats of an id already seen;
/// both are logged. Order is otherwise preserved.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if a context-switch URL cannot be built.
pub fn dealerships_from_response(
    response: DirectoryResponse,
    endpoints: &VendorEndpoints,
) -> Result<Vec<Dealership>, ScraperError> {
    let mut seen = HashSet::new();
    let mut dealerships = Vec::with_capacity(response.physical_store.len());

    for store in response.physical_store {
        let Some(id) = store.unique_id.as_ref().and_then(value_as_text) else {
            tracing::warn!(city = ?store.city, "skipping directory entry without uniqueID");
            continue;
        };
        if !seen.insert(id.clone()) {
            tracing::warn!(dealer_id = %id, "skipping duplicate directory entry");
            continue;
        }

        let name = store
            .description
            .iter()
            .find_map(|d| d.display_store_name.as_deref())
            .map(str::trim)
            .unwrap_or_default()
            .to_owned();

        let context_switch_url = endpoints.context_switch_url(&id)?;

        dealerships.push(Dealership {
            name,
            city: trimmed(store.city),
            state: trimmed(store.state),
            zip: trimmed(store.postal_code),
            phone: trimmed(store.phone),
            latitude: store.latitude.as_ref().map_or(f64::NAN, value_as_f64),
            longitude: store.longitude.as_ref().map_or(f64::NAN, value_as_f64),
            context_switch_url,
            id,
        });
    }

    Ok(dealerships)
}

fn trimmed(value: Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_owned()
}

fn value_as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn value_as_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}
