//! PredictIt payloads and normalization.

use edgescan_core::{Category, NormalizedMarket, Outcome};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Payload of `GET /all/`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarketsResponse {
    pub markets: Vec<RawPredictItMarket>,
}

/// Raw market record with its contracts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPredictItMarket {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub contracts: Vec<RawContract>,
}

/// One contract (candidate/outcome) within a market.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawContract {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub last_trade_price: Option<Value>,
    pub best_buy_yes_cost: Option<Value>,
}

impl RawPredictItMarket {
    /// Converts the raw record into a normalized market.
    ///
    /// A single contract becomes a binary Yes/No market; several contracts
    /// become one multi-outcome market. Returns `None` (skip) when the
    /// record has no id, no name, or no usable contract prices.
    #[must_use]
    pub fn into_normalized(self) -> Option<NormalizedMarket> {
        let market_id = self.id.as_ref().and_then(value_to_id)?;
        let question = self
            .name
            .or(self.short_name)
            .filter(|n| !n.is_empty())?;

        let outcomes = match self.contracts.len() {
            0 => return None,
            1 => {
                let yes = self.contracts[0].price()?;
                vec![
                    Outcome::new("Yes", yes),
                    Outcome::new("No", Decimal::ONE - yes),
                ]
            }
            _ => {
                let priced: Vec<Outcome> = self
                    .contracts
                    .iter()
                    .filter_map(|c| {
                        let price = c.price()?;
                        let name = c
                            .name
                            .clone()
                            .or_else(|| c.short_name.clone())
                            .unwrap_or_else(|| "Unknown".to_string());
                        Some(Outcome::new(name, price))
                    })
                    .collect();
                if priced.len() < 2 {
                    tracing::debug!(%market_id, "skipping market with fewer than 2 priced contracts");
                    return None;
                }
                priced
            }
        };

        let url = self
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("https://www.predictit.org/markets/detail/{market_id}"));

        Some(NormalizedMarket {
            platform: crate::PLATFORM.to_string(),
            market_id,
            category: Category::infer(&question),
            question,
            outcomes,
            // PredictIt does not expose volume or liquidity.
            volume: Decimal::ZERO,
            liquidity: Decimal::ZERO,
            end_date: None,
            active: self.status.as_deref() == Some("Open"),
            resolved: self.status.as_deref() == Some("Closed"),
            url: Some(url),
        })
    }
}

impl RawContract {
    /// Contract price: last trade, falling back to best buy-Yes cost.
    #[must_use]
    fn price(&self) -> Option<Decimal> {
        [&self.last_trade_price, &self.best_buy_yes_cost]
            .into_iter()
            .flatten()
            .find_map(decimal_from_value)
    }
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        _ => None,
    }
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
