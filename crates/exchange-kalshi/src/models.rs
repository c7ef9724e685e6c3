//! Raw Kalshi payloads and normalization.

use chrono::{DateTime, Utc};
use edgescan_core::{Category, NormalizedMarket, Outcome};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;

/// Payload of `GET /markets`.
///
/// Some deployments wrap the list in `{"markets": [...]}`, others return a
/// bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MarketsPayload {
    Wrapped { markets: Vec<RawKalshiMarket> },
    Bare(Vec<RawKalshiMarket>),
}

impl MarketsPayload {
    /// Unwraps into the market list.
    #[must_use]
    pub fn into_markets(self) -> Vec<RawKalshiMarket> {
        match self {
            Self::Wrapped { markets } => markets,
            Self::Bare(markets) => markets,
        }
    }
}

/// Raw market record from the Kalshi trade API.
///
/// Prices arrive in cents (0-100) and occasionally as strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawKalshiMarket {
    pub ticker: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub status: Option<String>,
    pub yes_bid: Option<Value>,
    pub yes_ask: Option<Value>,
    pub last_price: Option<Value>,
    pub volume: Option<Value>,
    pub dollar_volume: Option<Value>,
    pub open_interest: Option<Value>,
    pub close_time: Option<String>,
    pub expiration_time: Option<String>,
}

impl RawKalshiMarket {
    /// Converts the raw record into a normalized market.
    ///
    /// Returns `None` (skip) when the record has no ticker, no title, or
    /// no usable price. The No side is synthesized as `1 - yes`.
    #[must_use]
    pub fn into_normalized(self) -> Option<NormalizedMarket> {
        let market_id = self.ticker.filter(|t| !t.is_empty())?;
        let question = self.title.filter(|t| !t.is_empty())?;

        // Price precedence: last trade, then best ask, then best bid.
        let yes_price = [&self.last_price, &self.yes_ask, &self.yes_bid]
            .into_iter()
            .flatten()
            .find_map(decimal_from_value)
            .map(scale_cents)?;
        let no_price = Decimal::ONE - yes_price;

        let end_date = [&self.close_time, &self.expiration_time]
            .into_iter()
            .flatten()
            .find_map(|raw| parse_rfc3339(raw));

        let status = self.status.as_deref().unwrap_or("open");

        Some(NormalizedMarket {
            platform: crate::PLATFORM.to_string(),
            category: Category::infer(&question),
            url: Some(format!("https://kalshi.com/markets/{market_id}")),
            market_id,
            question,
            outcomes: vec![
                Outcome::new("Yes", yes_price),
                Outcome::new("No", no_price),
            ],
            volume: [&self.volume, &self.dollar_volume]
                .into_iter()
                .flatten()
                .find_map(decimal_from_value)
                .unwrap_or(Decimal::ZERO),
            liquidity: self
                .open_interest
                .as_ref()
                .and_then(decimal_from_value)
                .unwrap_or(Decimal::ZERO),
            end_date,
            active: status == "open",
            resolved: status == "closed" || status == "settled",
        })
    }
}

/// Scales a cent-quoted price into a probability. Values already in
/// `[0, 1]` pass through unchanged.
fn scale_cents(price: Decimal) -> Decimal {
    if price > Decimal::ONE {
        price / dec!(100)
    } else {
        price
    }
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        _ => None,
    }
}

fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
