//! Gamma API client.

use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use edgescan_core::{NormalizedMarket, PlatformAdapter};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::models::RawGammaMarket;

/// Gamma API base URL.
pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Rate-limited client for the Polymarket Gamma API.
pub struct GammaClient {
    http: Client,
    base_url: String,
    rate_limiter: Arc<DirectRateLimiter>,
}

impl GammaClient {
    /// Creates a new client, rate limited to 30 requests per minute.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(nonzero!(30u32))
    }

    /// Creates a new client with a custom per-minute quota.
    #[must_use]
    pub fn with_rate_limit(requests_per_minute: NonZeroU32) -> Self {
        Self {
            http: Client::new(),
            base_url: GAMMA_API_URL.to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(requests_per_minute))),
        }
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for the rate limiter and issues a GET request.
    async fn get_raw(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<RawGammaMarket>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");

        let response = self.http.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gamma API error {}: {}", status, text));
        }

        Ok(response.json().await?)
    }

    /// Fetches active, unresolved markets.
    ///
    /// Individual records that fail normalization are skipped.
    pub async fn get_markets(&self, limit: usize) -> Result<Vec<NormalizedMarket>> {
        let query = [
            ("limit", limit.to_string()),
            ("active", "true".to_string()),
            ("closed", "false".to_string()),
        ];
        let raw = self.get_raw("/markets", &query).await?;

        let total = raw.len();
        let markets: Vec<NormalizedMarket> = raw
            .into_iter()
            .filter_map(RawGammaMarket::into_normalized)
            .collect();

        tracing::info!(
            fetched = total,
            normalized = markets.len(),
            "fetched Polymarket markets"
        );
        Ok(markets)
    }

    /// Fetches a single market by id.
    pub async fn get_market(&self, market_id: &str) -> Result<Option<NormalizedMarket>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/markets/{}", self.base_url, market_id);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gamma API error {}: {}", status, text));
        }

        let raw: RawGammaMarket = response.json().await?;
        Ok(raw.into_normalized())
    }

    /// Searches markets by query string.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<NormalizedMarket>> {
        let query = [
            ("limit", limit.to_string()),
            ("active", "true".to_string()),
            ("_q", query.to_string()),
        ];
        let raw = self.get_raw("/markets", &query).await?;
        Ok(raw
            .into_iter()
            .filter_map(RawGammaMarket::into_normalized)
            .collect())
    }
}

impl Default for GammaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformAdapter for GammaClient {
    fn platform_id(&self) -> &'static str {
        crate::PLATFORM
    }

    fn fee_rate(&self) -> Decimal {
        crate::DEFAULT_FEE_RATE
    }

    async fn fetch_markets(&self, limit: usize) -> Result<Vec<NormalizedMarket>> {
        self.get_markets(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MARKETS_FIXTURE: &str = r#"[
        {
            "id": 1,
            "question": "Will Bitcoin reach $100K in 2025?",
            "slug": "btc-100k",
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"0.40\", \"0.55\"]",
            "volume": "150000",
            "active": true,
            "closed": false
        },
        {
            "id": 2,
            "question": "Broken record without prices"
        }
    ]"#;

    #[tokio::test]
    async fn test_get_markets_normalizes_and_skips() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets"))
            .and(query_param("active", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(MARKETS_FIXTURE, "application/json"),
            )
            .mount(&server)
            .await;

        let client = GammaClient::new().with_base_url(server.uri());
        let markets = client.get_markets(50).await.unwrap();

        // The malformed second record is dropped, not an error.
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].platform, "polymarket");
        assert_eq!(markets[0].market_id, "1");
    }

    #[tokio::test]
    async fn test_get_markets_http_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = GammaClient::new().with_base_url(server.uri());
        let err = client.get_markets(50).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_adapter_identity() {
        let client = GammaClient::new();
        assert_eq!(client.platform_id(), "polymarket");
        assert_eq!(client.fee_rate(), crate::DEFAULT_FEE_RATE);
    }
}
