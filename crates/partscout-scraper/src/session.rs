//! Cookie-carrying HTTP session against the vendor site.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;

use partscout_core::AppConfig;

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

/// HTTP session for one search run.
///
/// Owns a private cookie jar: the vendor keeps the selected dealer context in
/// a session cookie, so every request of a run must go through the same
/// `SessionClient`, and two runs must never share one. The type is
/// deliberately not `Clone`.
///
/// Every request gets the configured timeout and is retried with exponential
/// backoff on transient errors (network failures, 429, 5xx) up to
/// `max_retries` additional attempts.
pub struct SessionClient {
    client: Client,
    accept_language: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_ms * 2^(retry - 1)`.
    backoff_base_ms: u64,
}

impl SessionClient {
    /// Creates a session with a fresh cookie jar.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        accept_language: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            accept_language: accept_language.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Creates a session using the timeout, headers, and retry policy in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            &config.accept_language,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Issues one request and returns the response body as text.
    ///
    /// `params` are appended to the URL's query string. Cookies set by any
    /// earlier response of this session are sent along.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status
    ///   (5xx retried, 4xx not).
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    pub async fn issue(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let method = method.clone();
            async move {
                let response = self
                    .client
                    .request(method, url)
                    .query(params)
                    .header(reqwest::header::ACCEPT_LANGUAGE, &self.accept_language)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(ScraperError::RateLimited {
                        url: url.to_owned(),
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Convenience wrapper for a `GET` returning the body as text.
    ///
    /// # Errors
    ///
    /// See [`SessionClient::issue`].
    pub async fn get_text(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, ScraperError> {
        self.issue(Method::GET, url, params).await
    }

    /// `GET`s `url` and deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// See [`SessionClient::issue`]; additionally [`ScraperError::Deserialize`]
    /// if the body is not the expected JSON shape (not retried).
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, ScraperError> {
        let body = self.get_text(url, &[]).await?;
        serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
            context: context.to_owned(),
            source,
        })
    }
}
