//! Platform-agnostic market representation.
//!
//! Every exchange adapter normalizes its raw payloads into
//! [`NormalizedMarket`] so the matchers and detectors can compare markets
//! from different venues without knowing where they came from.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// A single outcome of a market and its quoted price.
///
/// Prices are implied probabilities in `[0, 1]`. The sum of a market's
/// outcome prices is NOT assumed to equal 1 — the deviation from 1 is
/// exactly what the arbitrage detectors look for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Outcome name ("Yes", "No", a candidate name, ...).
    pub name: String,
    /// Quoted price in `[0, 1]`.
    pub price: Decimal,
}

impl Outcome {
    /// Creates an outcome from a name and price.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Unified view of one market, normalized from any supported platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedMarket {
    /// Source platform identifier ("polymarket", "kalshi", ...).
    pub platform: String,

    /// Platform-scoped market identifier.
    pub market_id: String,

    /// Market question, free text.
    pub question: String,

    /// Ordered outcomes with prices. At least 2 entries for any market
    /// that survives normalization.
    pub outcomes: Vec<Outcome>,

    /// Traded volume in USD-equivalent units; 0 when the platform does not
    /// report it.
    pub volume: Decimal,

    /// Available liquidity; 0 when unreported.
    pub liquidity: Decimal,

    /// Resolution/close time. Markets without one are excluded from
    /// time-bounded scans.
    pub end_date: Option<DateTime<Utc>>,

    /// Whether the market is currently open for trading.
    pub active: bool,

    /// Whether the market has resolved.
    pub resolved: bool,

    /// Coarse category inferred from the question text.
    pub category: Category,

    /// Link to the market on its platform, when derivable.
    pub url: Option<String>,
}

impl NormalizedMarket {
    /// Sum of all outcome prices.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.outcomes.iter().map(|o| o.price).sum()
    }

    /// Returns true for two-outcome markets.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.outcomes.len() == 2
    }

    /// Returns true if the market is open: active and not resolved.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.active && !self.resolved
    }

    /// Price of the "Yes" side.
    ///
    /// Matches an outcome named "Yes"/"True" (case-insensitive), falling
    /// back to the first outcome when no name matches.
    #[must_use]
    pub fn yes_price(&self) -> Option<Decimal> {
        self.outcomes
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case("yes") || o.name.eq_ignore_ascii_case("true"))
            .or_else(|| self.outcomes.first())
            .map(|o| o.price)
    }

    /// Price of the "No" side.
    ///
    /// Matches an outcome named "No"/"False" (case-insensitive), falling
    /// back to the second outcome when no name matches.
    #[must_use]
    pub fn no_price(&self) -> Option<Decimal> {
        self.outcomes
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case("no") || o.name.eq_ignore_ascii_case("false"))
            .or_else(|| self.outcomes.get(1))
            .map(|o| o.price)
    }

    /// Price of a named outcome, case-insensitive.
    #[must_use]
    pub fn outcome_price(&self, name: &str) -> Option<Decimal> {
        self.outcomes
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
            .map(|o| o.price)
    }

    /// Days until resolution, when an end date is known.
    #[must_use]
    pub fn days_to_resolution(&self, now: DateTime<Utc>) -> Option<i64> {
        self.end_date.map(|end| (end - now).num_days())
    }

    /// Stable key identifying this market across a scan.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.platform, self.market_id)
    }
}
