use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("rate limited by {url}")]
    RateLimited { url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ScraperError {
    /// Returns `true` for failures of the transport itself: anything that
    /// means the vendor could not be reached or answered with an error status.
    ///
    /// These are the errors that abort a run once retries are exhausted.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_)
                | ScraperError::UnexpectedStatus { .. }
                | ScraperError::RateLimited { .. }
        )
    }

    /// The vendor URL the failed request was addressed to, when known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            ScraperError::Http(e) => e.url().map(reqwest::Url::as_str),
            ScraperError::UnexpectedStatus { url, .. }
            | ScraperError::RateLimited { url }
            | ScraperError::InvalidUrl { url, .. } => Some(url),
            ScraperError::Deserialize { .. } => None,
        }
    }
}
