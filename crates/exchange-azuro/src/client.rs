//! Azuro subgraph client.

use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use edgescan_core::{NormalizedMarket, PlatformAdapter};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::json;

use crate::models::{GraphQlResponse, RawCondition};

/// Subgraph endpoints per chain.
const SUBGRAPH_URLS: &[(&str, &str)] = &[
    (
        "polygon",
        "https://thegraph.azuro.org/subgraphs/name/azuro-protocol/azuro-api-polygon-v3",
    ),
    (
        "gnosis",
        "https://thegraph.azuro.org/subgraphs/name/azuro-protocol/azuro-api-gnosis-v3",
    ),
    (
        "arbitrum",
        "https://thegraph.azuro.org/subgraphs/name/azuro-protocol/azuro-api-arbitrum-one-v3",
    ),
];

const CONDITIONS_QUERY: &str = r"
query GetConditions($first: Int!) {
    conditions(
        first: $first
        where: { status: Created }
        orderBy: turnover
        orderDirection: desc
    ) {
        id
        conditionId
        status
        turnover
        game {
            id
            title
            startsAt
            sport { name }
            league { name }
        }
        outcomes {
            id
            outcomeId
            currentOdds
        }
    }
}
";

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Rate-limited GraphQL client for the Azuro subgraph.
pub struct AzuroClient {
    http: Client,
    subgraph_url: String,
    rate_limiter: Arc<DirectRateLimiter>,
}

impl AzuroClient {
    /// Creates a client for the given chain, defaulting to Polygon when
    /// the chain is unknown. Rate limited to 30 requests per minute.
    #[must_use]
    pub fn new(chain: &str) -> Self {
        let subgraph_url = SUBGRAPH_URLS
            .iter()
            .find(|(name, _)| *name == chain)
            .map(|(_, url)| *url)
            .unwrap_or(SUBGRAPH_URLS[0].1);

        Self {
            http: Client::new(),
            subgraph_url: subgraph_url.to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(nonzero!(30u32)))),
        }
    }

    /// Sets a custom subgraph URL (useful for testing).
    #[must_use]
    pub fn with_subgraph_url(mut self, url: impl Into<String>) -> Self {
        self.subgraph_url = url.into();
        self
    }

    /// Fetches the highest-turnover open conditions, normalized.
    pub async fn get_markets(&self, limit: usize) -> Result<Vec<NormalizedMarket>> {
        self.rate_limiter.until_ready().await;

        let body = json!({
            "query": CONDITIONS_QUERY,
            "variables": { "first": limit },
        });

        tracing::debug!(url = %self.subgraph_url, "POST GraphQL conditions query");
        let response = self.http.post(&self.subgraph_url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Azuro subgraph error {}: {}", status, text));
        }

        let payload: GraphQlResponse = response.json().await?;
        if let Some(errors) = payload.errors.filter(|e| !e.is_empty()) {
            return Err(anyhow!("Azuro GraphQL errors: {errors:?}"));
        }

        let conditions = payload.data.map(|d| d.conditions).unwrap_or_default();
        let total = conditions.len();
        let markets: Vec<NormalizedMarket> = conditions
            .into_iter()
            .filter_map(RawCondition::into_normalized)
            .collect();

        tracing::info!(
            fetched = total,
            normalized = markets.len(),
            "fetched Azuro conditions"
        );
        Ok(markets)
    }

    /// Searches events by filtering fetched titles locally.
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

#[async_trait]
impl PlatformAdapter for AzuroClient {
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
