//! Kalshi trade API client.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use edgescan_core::{NormalizedMarket, PlatformAdapter};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::error::{KalshiError, Result};
use crate::models::{MarketsPayload, RawKalshiMarket};

/// Public trade API base URL.
pub const KALSHI_API_URL: &str = "https://api.elections.kalshi.com/trade-api/v2";

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Rate-limited client for the Kalshi trade API.
///
/// Market data is public; an API key is only attached when provided.
pub struct KalshiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    rate_limiter: Arc<DirectRateLimiter>,
}

impl KalshiClient {
    /// Creates a new unauthenticated client, rate limited to 30 requests
    /// per minute.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(nonzero!(30u32))
    }

    /// Creates a new client with a custom per-minute quota.
    #[must_use]
    pub fn with_rate_limit(requests_per_minute: NonZeroU32) -> Self {
        Self {
            http: Client::new(),
            base_url: KALSHI_API_URL.to_string(),
            api_key: None,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(requests_per_minute))),
        }
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Attaches an API key sent as a bearer token.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    async fn get_payload(&self, path: &str, query: &[(&str, String)]) -> Result<MarketsPayload> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");

        let mut request = self.http.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(KalshiError::api(status, text));
        }

        Ok(response.json().await?)
    }

    /// Fetches open markets, normalized.
    pub async fn get_markets(&self, limit: usize) -> Result<Vec<NormalizedMarket>> {
        let query = [
            ("limit", limit.to_string()),
            ("status", "open".to_string()),
        ];
        let payload = self.get_payload("/markets", &query).await?;

        let raw = payload.into_markets();
        let total = raw.len();
        let markets: Vec<NormalizedMarket> = raw
            .into_iter()
            .take(limit)
            .filter_map(RawKalshiMarket::into_normalized)
            .collect();

        tracing::info!(
            fetched = total,
            normalized = markets.len(),
            "fetched Kalshi markets"
        );
        Ok(markets)
    }

    /// Searches markets by filtering fetched titles locally; the public
    /// API has no free-text query.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<NormalizedMarket>> {
        let markets = self.get_markets(200).await?;
        let needle = query.to_lowercase();
        Ok(markets
            .into_iter()
            .filter(|m| m.question.to_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }
}

impl Default for KalshiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformAdapter for KalshiClient {
    fn platform_id(&self) -> &'static str {
        crate::PLATFORM
    }

    fn fee_rate(&self) -> Decimal {
        crate::DEFAULT_FEE_RATE
    }

    async fn fetch_markets(&self, limit: usize) -> anyhow::Result<Vec<NormalizedMarket>> {
        Ok(self.get_markets(limit).await?)
    }
}
