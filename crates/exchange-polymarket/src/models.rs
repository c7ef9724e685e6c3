//! Raw Gamma API payloads and normalization.

use chrono::{DateTime, Utc};
use edgescan_core::{Category, NormalizedMarket, Outcome};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Raw market record from `GET /markets`.
///
/// Gamma is loose with types: `outcomes` and `outcomePrices` are usually
/// JSON-encoded string arrays, `volume`/`liquidity` arrive as strings or
/// numbers, and `id` may be numeric. Everything optional stays optional
/// here; normalization decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGammaMarket {
    pub id: Option<Value>,
    pub condition_id: Option<String>,
    pub question: Option<String>,
    pub slug: Option<String>,
    pub outcomes: Option<Value>,
    pub outcome_prices: Option<Value>,
    pub volume: Option<Value>,
    pub liquidity: Option<Value>,
    pub end_date: Option<String>,
    pub active: Option<bool>,
    pub closed: Option<bool>,
}

impl RawGammaMarket {
    /// Converts the raw record into a normalized market.
    ///
    /// Returns `None` (skip) when the record has no question, no usable
    /// outcome prices, or fewer than 2 outcomes after pairing names with
    /// prices. Malformed records never surface as errors.
    #[must_use]
    pub fn into_normalized(self) -> Option<NormalizedMarket> {
        let question = self.question.filter(|q| !q.is_empty())?;

        let market_id = self
            .id
            .as_ref()
            .and_then(value_to_id)
            .or(self.condition_id)
            .filter(|id| !id.is_empty())?;

        let prices = self.outcome_prices.as_ref().and_then(decode_price_list)?;
        let names = self
            .outcomes
            .as_ref()
            .and_then(decode_string_list)
            .unwrap_or_else(|| vec!["Yes".to_string(), "No".to_string()]);

        let outcomes: Vec<Outcome> = names
            .into_iter()
            .zip(prices)
            .map(|(name, price)| Outcome::new(name, price))
            .collect();
        if outcomes.len() < 2 {
            tracing::debug!(%market_id, "skipping market with fewer than 2 priced outcomes");
            return None;
        }

        let end_date = self.end_date.as_deref().and_then(parse_rfc3339);
        let url = self
            .slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|slug| format!("https://polymarket.com/event/{slug}"));

        Some(NormalizedMarket {
            platform: crate::PLATFORM.to_string(),
            market_id,
            category: Category::infer(&question),
            question,
            outcomes,
            volume: self
                .volume
                .as_ref()
                .and_then(decimal_from_value)
                .unwrap_or(Decimal::ZERO),
            liquidity: self
                .liquidity
                .as_ref()
                .and_then(decimal_from_value)
                .unwrap_or(Decimal::ZERO),
            end_date,
            active: self.active.unwrap_or(true),
            resolved: self.closed.unwrap_or(false),
            url,
        })
    }
}

/// Decodes a list of strings that may itself be JSON-encoded.
fn decode_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => serde_json::from_str(s).ok(),
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

/// Decodes a list of prices from a JSON-encoded string array or a plain
/// array of strings/numbers.
fn decode_price_list(value: &Value) -> Option<Vec<Decimal>> {
    match value {
        Value::String(s) => {
            let raw: Vec<Value> = serde_json::from_str(s).ok()?;
            raw.iter().map(decimal_from_value).collect()
        }
        Value::Array(items) => items.iter().map(decimal_from_value).collect(),
        _ => None,
    }
}

/// Parses a decimal out of a JSON string or number.
fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        _ => None,
    }
}

/// Extracts a market id from a JSON string or number.
fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
