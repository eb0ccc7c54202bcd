//! HTTP client for the treatment reference service.
//!
//! Thin reqwest wrapper implementing [`SearchApi`] against the hosted search
//! backend. The client is built once at construction with a generous timeout
//! (the free hosting tier cold-starts, so first requests can be slow) and is
//! injected into the coordinator rather than shared through a global.

use crate::domain::{MeridianError, OrganRecord, Result};
use crate::remote::api::SearchApi;
use crate::remote::normalize::normalize_response;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::time::Duration;

/// Default base endpoint of the hosted search service.
pub const DEFAULT_BASE_URL: &str = "https://fastapi-hosting.onrender.com";

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Reqwest-backed client for the treatment reference service.
pub struct HttpSearchApi {
    /// Underlying HTTP client, built once with the configured timeout.
    client: reqwest::Client,
    /// Base endpoint without a trailing slash.
    base_url: String,
}

impl HttpSearchApi {
    /// Creates a client bound to the given base endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`MeridianError::Network`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MeridianError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the search endpoint URL.
    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    /// Returns the liveness endpoint URL.
    fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    async fn fetch_search(&self, query: &str) -> Result<Vec<OrganRecord>> {
        tracing::debug!(query = %query, url = %self.search_url(), "issuing search request");

        let response = self
            .client
            .get(self.search_url())
            .query(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "search request rejected");
            return Err(MeridianError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| MeridianError::MalformedResponse(format!("undecodable body: {e}")))?;

        let records = normalize_response(value)?;
        tracing::debug!(record_count = records.len(), "search request succeeded");
        Ok(records)
    }

    async fn fetch_health(&self) -> Result<()> {
        let response = self.client.get(self.health_url()).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(MeridianError::Http {
                status: status.as_u16(),
            })
        }
    }
}

impl SearchApi for HttpSearchApi {
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<OrganRecord>>> {
        self.fetch_search(query).boxed()
    }

    fn health(&self) -> BoxFuture<'_, Result<()>> {
        self.fetch_health().boxed()
    }
}

impl std::fmt::Debug for HttpSearchApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSearchApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls() {
        let api = HttpSearchApi::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            api.search_url(),
            "https://fastapi-hosting.onrender.com/search"
        );
        assert_eq!(
            api.health_url(),
            "https://fastapi-hosting.onrender.com/health"
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let api = HttpSearchApi::new("https://example.test/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(api.search_url(), "https://example.test/search");
    }

    #[test]
    fn client_creation() {
        assert!(HttpSearchApi::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT).is_ok());
    }
}
