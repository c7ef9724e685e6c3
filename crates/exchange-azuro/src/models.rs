//! Azuro subgraph payloads and normalization.

use chrono::{DateTime, Utc};
use edgescan_core::{Category, NormalizedMarket, Outcome};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<ConditionsData>,
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
}

/// `conditions` query result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionsData {
    #[serde(default)]
    pub conditions: Vec<RawCondition>,
}

/// A betting condition (one market) from the subgraph.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCondition {
    pub id: Option<String>,
    pub condition_id: Option<String>,
    pub status: Option<String>,
    /// Total turnover in wei.
    pub turnover: Option<Value>,
    pub game: Option<RawGame>,
    #[serde(default)]
    pub outcomes: Vec<RawOutcome>,
}

/// Game metadata attached to a condition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGame {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Unix timestamp, usually serialized as a string.
    pub starts_at: Option<Value>,
    pub sport: Option<NamedEntity>,
    pub league: Option<NamedEntity>,
}

/// `{ name }` sub-object used for sports and leagues.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedEntity {
    pub name: Option<String>,
}

/// One selectable outcome with current decimal odds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOutcome {
    pub id: Option<String>,
    pub outcome_id: Option<Value>,
    pub current_odds: Option<Value>,
}

/// Wei per token unit.
const WEI_PER_UNIT: f64 = 1e18;

impl RawCondition {
    /// Converts the raw condition into a normalized market.
    ///
    /// Returns `None` (skip) when the game metadata is missing or fewer
    /// than 2 outcomes carry positive odds.
    #[must_use]
    pub fn into_normalized(self) -> Option<NormalizedMarket> {
        let game = self.game?;
        let title = game.title.filter(|t| !t.is_empty())?;
        let market_id = self
            .id
            .or(self.condition_id)
            .filter(|id| !id.is_empty())?;

        let league = game
            .league
            .and_then(|l| l.name)
            .filter(|n| !n.is_empty());
        let question = match &league {
            Some(league) => format!("{league}: {title}"),
            None => title.clone(),
        };

        let outcomes: Vec<Outcome> = self
            .outcomes
            .iter()
            .filter_map(RawOutcome::to_outcome)
            .collect();
        if outcomes.len() < 2 {
            tracing::debug!(%market_id, "skipping condition with fewer than 2 priced outcomes");
            return None;
        }

        let end_date = game.starts_at.as_ref().and_then(timestamp_from_value);
        let volume = self
            .turnover
            .as_ref()
            .and_then(wei_to_units)
            .unwrap_or(Decimal::ZERO);

        let status = self.status.as_deref().unwrap_or("Created");
        let url = game
            .id
            .map(|game_id| format!("https://bookmaker.xyz/events/{game_id}"));

        Some(NormalizedMarket {
            platform: crate::PLATFORM.to_string(),
            market_id,
            question,
            outcomes,
            volume,
            liquidity: Decimal::ZERO,
            end_date,
            active: status == "Created",
            resolved: status == "Resolved" || status == "Canceled",
            category: Category::Sports,
            url,
        })
    }
}

impl RawOutcome {
    /// Converts odds into an implied-probability outcome.
    ///
    /// Odds must be positive; `price = 1 / odds`.
    #[must_use]
    fn to_outcome(&self) -> Option<Outcome> {
        let odds = self.current_odds.as_ref().and_then(decimal_from_value)?;
        if odds <= Decimal::ZERO {
            return None;
        }
        let price = Decimal::ONE / odds;
        Some(Outcome::new(self.outcome_name(), price))
    }

    /// Maps numeric outcome ids to readable names (1 = Home, 2 = Away,
    /// 3 = Draw).
    fn outcome_name(&self) -> String {
        let id = self
            .outcome_id
            .as_ref()
            .and_then(|v| match v {
                Value::String(s) => s.parse::<u32>().ok(),
                Value::Number(n) => n.as_u64().map(|n| n as u32),
                _ => None,
            })
            .unwrap_or(0);

        match id {
            1 => "Home".to_string(),
            2 => "Away".to_string(),
            3 => "Draw".to_string(),
            other => format!("Outcome {other}"),
        }
    }
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        _ => None,
    }
}

/// Converts a wei-denominated value into whole token units.
fn wei_to_units(value: &Value) -> Option<Decimal> {
    let wei = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    Decimal::try_from(wei / WEI_PER_UNIT).ok()
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0)
}
