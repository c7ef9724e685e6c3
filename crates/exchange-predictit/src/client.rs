//! PredictIt market-data client.

use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use edgescan_core::{NormalizedMarket, PlatformAdapter};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::models::{MarketsResponse, RawPredictItMarket};

/// Public market-data API base URL.
pub const PREDICTIT_API_URL: &str = "https://www.predictit.org/api/marketdata";

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Rate-limited client for the PredictIt market-data API.
pub struct PredictItClient {
    http: Client,
    base_url: String,
    rate_limiter: Arc<DirectRateLimiter>,
}

impl PredictItClient {
    /// Creates a new client, rate limited to 30 requests per minute.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            base_url: PREDICTIT_API_URL.to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(nonzero!(30u32)))),
        }
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetches all markets; the API has no pagination, so `limit` caps the
    /// result locally.
    pub async fn get_markets(&self, limit: usize) -> Result<Vec<NormalizedMarket>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/all/", self.base_url);
        tracing::debug!(%url, "GET");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("PredictIt API error {}: {}", status, text));
        }

        let payload: MarketsResponse = response.json().await?;
        let total = payload.markets.len();
        let markets: Vec<NormalizedMarket> = payload
            .markets
            .into_iter()
            .take(limit)
            .filter_map(RawPredictItMarket::into_normalized)
            .collect();

        tracing::info!(
            fetched = total,
            normalized = markets.len(),
            "fetched PredictIt markets"
        );
        Ok(markets)
    }

    /// Searches markets by filtering fetched names locally; the API has no
    /// query endpoint.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<NormalizedMarket>> {
        let markets = self.get_markets(500).await?;
        let needle = query.to_lowercase();
        Ok(markets
            .into_iter()
            .filter(|m| m.question.to_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }
}

impl Default for PredictItClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformAdapter for PredictItClient {
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
