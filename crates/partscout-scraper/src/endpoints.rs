//! URL builders for the vendor's store-locator, search, context-switch, and
//! price-view endpoints.

use reqwest::Url;

use partscout_core::{AppConfig, Location, LookupParams};

use crate::error::ScraperError;

/// Path of the price view; also the marker the search page's canonical
/// price link is recognised by.
pub(crate) const PRICE_VIEW_PATH: &str = "/shop/FordProductPriceAndShopperActionsDisplayView";

/// Every vendor URL a run touches, derived from one origin plus the vendor's
/// store and catalog identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorEndpoints {
    base_url: String,
    store_id: String,
    catalog_id: String,
}

impl VendorEndpoints {
    /// `base_url` is an origin such as `"https://parts.ford.com"`; a trailing
    /// slash is ignored.
    #[must_use]
    pub fn new(base_url: &str, store_id: &str, catalog_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            store_id: store_id.to_owned(),
            catalog_id: catalog_id.to_owned(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.base_url, &config.store_id, &config.catalog_id)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store-locator query returning JSON for dealers within `radius_miles`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the configured origin does not
    /// form a valid URL.
    pub fn directory_url(
        &self,
        location: Location,
        radius_miles: f64,
        max_items: u32,
    ) -> Result<String, ScraperError> {
        let base = format!(
            "{}/wcs/resources/store/{}/storelocator/latitude/{}/longitude/{}",
            self.base_url, self.store_id, location.latitude, location.longitude
        );
        let mut url = self.parse(&base)?;
        url.query_pairs_mut()
            .append_pair("radius", &radius_miles.to_string())
            .append_pair("radiusUOM", "miles")
            .append_pair("maxItems", &max_items.to_string())
            .append_pair("siteLevelStoreSearch", "false")
            .append_pair("responseFormat", "json");
        Ok(url.to_string())
    }

    /// Keyword search page for one raw search term. The term is
    /// percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the configured origin does not
    /// form a valid URL.
    pub fn search_url(&self, search_term: &str) -> Result<String, ScraperError> {
        let base = format!("{}/webapp/wcs/stores/servlet/en/us/SearchDisplay", self.base_url);
        let mut url = self.parse(&base)?;
        url.query_pairs_mut()
            .append_pair("searchTerm", search_term)
            .append_pair("storeId", &self.store_id)
            .append_pair("catalogId", &self.catalog_id)
            .append_pair("langId", "-1")
            .append_pair("searchType", "keyword");
        Ok(url.to_string())
    }

    /// URL that, when fetched, pins the session to `dealer_id`'s inventory.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the configured origin does not
    /// form a valid URL.
    pub fn context_switch_url(&self, dealer_id: &str) -> Result<String, ScraperError> {
        let base = format!("{}/shop/ContractSetInSession", self.base_url);
        let landing = format!("{}/shop/en/us/shop-parts", self.base_url);
        let mut url = self.parse(&base)?;
        url.query_pairs_mut()
            .append_pair("catalogId", &self.catalog_id)
            .append_pair("langId", "-1")
            .append_pair("URL", &landing)
            .append_pair("storeId", &self.store_id)
            .append_pair("dealerId", dealer_id);
        Ok(url.to_string())
    }

    /// Price view for one part under the currently selected dealer context.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the configured origin does not
    /// form a valid URL.
    pub fn price_url(&self, lookup: &LookupParams) -> Result<String, ScraperError> {
        let base = format!("{}{PRICE_VIEW_PATH}", self.base_url);
        let mut url = self.parse(&base)?;
        url.query_pairs_mut()
            .append_pair("catalogId", &self.catalog_id)
            .append_pair("storeId", &self.store_id)
            .append_pair("langId", "-1")
            .append_pair("buyable", "true")
            .append_pair("skuID", &lookup.sku_id)
            .append_pair("mfPartNumber", &lookup.part_number)
            .append_pair("uniqueID", &lookup.unique_id);
        Ok(url.to_string())
    }

    fn parse(&self, raw: &str) -> Result<Url, ScraperError> {
        Url::parse(raw).map_err(|e| ScraperError::InvalidUrl {
            url: raw.to_owned(),
            reason: format!("origin \"{}\" is not a valid URL base: {e}", self.base_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> VendorEndpoints {
        VendorEndpoints::new("https://parts.ford.com/", "1405", "251")
    }

    #[test]
    fn directory_url_carries_location_and_limits() {
        let url = endpoints()
            .directory_url(
                Location {
                    latitude: 42.33,
                    longitude: -83.05,
                },
                50.0,
                25,
            )
            .unwrap();
        assert_eq!(
            url,
            "https://parts.ford.com/wcs/resources/store/1405/storelocator/latitude/42.33/longitude/-83.05\
             ?radius=50&radiusUOM=miles&maxItems=25&siteLevelStoreSearch=false&responseFormat=json"
        );
    }

    #[test]
    fn search_url_encodes_the_term() {
        let url = endpoints().search_url("oil filter & gasket").unwrap();
        assert!(url.starts_with(
            "https://parts.ford.com/webapp/wcs/stores/servlet/en/us/SearchDisplay?searchTerm=oil+filter+%26+gasket"
        ));
        assert!(url.ends_with("&storeId=1405&catalogId=251&langId=-1&searchType=keyword"));
    }

    #[test]
    fn context_switch_url_names_the_dealer() {
        let url = endpoints().context_switch_url("D123").unwrap();
        assert!(url.starts_with("https://parts.ford.com/shop/ContractSetInSession?catalogId=251"));
        assert!(url.contains("URL=https%3A%2F%2Fparts.ford.com%2Fshop%2Fen%2Fus%2Fshop-parts"));
        assert!(url.ends_with("&storeId=1405&dealerId=D123"));
    }

    #[test]
    fn price_url_includes_lookup_params() {
        let url = endpoints()
            .price_url(&LookupParams {
                sku_id: "111".to_owned(),
                part_number: "FL-500-S".to_owned(),
                unique_id: "222".to_owned(),
            })
            .unwrap();
        assert_eq!(
            url,
            "https://parts.ford.com/shop/FordProductPriceAndShopperActionsDisplayView\
             ?catalogId=251&storeId=1405&langId=-1&buyable=true&skuID=111&mfPartNumber=FL-500-S&uniqueID=222"
        );
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let result = VendorEndpoints::new("not a url", "1", "2").search_url("x");
        assert!(
            matches!(result, Err(ScraperError::InvalidUrl { .. })),
            "got: {result:?}"
        );
    }
}
