//! Opportunity records and matched-event types.
//!
//! These are the records the detectors emit and presentation layers
//! consume. All of them are derived fresh each scan and never persisted.

use std::collections::{BTreeMap, BTreeSet};

use edgescan_core::{Category, NormalizedMarket};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::keywords::{Direction, Topic};

// =============================================================================
// Matched Event
// =============================================================================

/// A cluster of markets from different platforms believed to represent the
/// same real-world event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedEvent {
    /// Short event name (primary market's question, truncated).
    pub name: String,

    /// Category of the primary market.
    pub category: Category,

    /// One market per platform; keys are platform identifiers.
    pub markets: BTreeMap<String, NormalizedMarket>,

    /// Keywords that drove the match.
    pub keywords: BTreeSet<String>,

    /// Best pairwise similarity in the cluster (0.0 to 1.0).
    pub confidence: f64,

    /// Human-readable note on what matched.
    pub match_reason: String,
}

impl MatchedEvent {
    /// Platforms participating in the event.
    #[must_use]
    pub fn platforms(&self) -> Vec<&str> {
        self.markets.keys().map(String::as_str).collect()
    }

    /// Number of participating platforms.
    #[must_use]
    pub fn num_platforms(&self) -> usize {
        self.markets.len()
    }

    /// Per-platform price for a named outcome.
    #[must_use]
    pub fn prices_for(&self, outcome: &str) -> BTreeMap<&str, Decimal> {
        self.markets
            .iter()
            .filter_map(|(platform, market)| {
                market
                    .outcome_price(outcome)
                    .map(|price| (platform.as_str(), price))
            })
            .collect()
    }

    /// Cheapest venue to buy a named outcome.
    #[must_use]
    pub fn best_buy(&self, outcome: &str) -> Option<(&str, Decimal)> {
        self.prices_for(outcome)
            .into_iter()
            .min_by(|a, b| a.1.cmp(&b.1))
    }

    /// Most expensive venue for a named outcome.
    #[must_use]
    pub fn best_sell(&self, outcome: &str) -> Option<(&str, Decimal)> {
        self.prices_for(outcome)
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1))
    }

    /// Spread between the highest and lowest quote for a named outcome;
    /// zero when fewer than two platforms quote it.
    #[must_use]
    pub fn price_spread(&self, outcome: &str) -> Decimal {
        let prices: Vec<Decimal> = self.prices_for(outcome).into_values().collect();
        if prices.len() < 2 {
            return Decimal::ZERO;
        }
        let min = prices.iter().min().copied().unwrap_or_default();
        let max = prices.iter().max().copied().unwrap_or_default();
        max - min
    }
}

// =============================================================================
// Intra-Platform Opportunity
// =============================================================================

/// Market shape for an intra-platform opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    /// Exactly two outcomes.
    Binary,
    /// Three or more outcomes.
    MultiOutcome,
}

/// Buying every outcome of one market costs less than the guaranteed $1
/// payout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntraPlatformOpportunity {
    /// The mispriced market.
    pub market: NormalizedMarket,

    /// Binary or multi-outcome.
    pub kind: MarketKind,

    /// Cost of buying all outcomes, per $1 of payout.
    pub total_cost: Decimal,

    /// Profit before fees, percent of stake.
    pub gross_profit_pct: Decimal,

    /// Profit after the platform fee on winnings, percent of stake.
    pub net_profit_pct: Decimal,

    /// Fee rate used for the net figure.
    pub fee_rate: Decimal,

    /// Fraction of the stake to place on each outcome; sums to 1 and
    /// guarantees a flat payout whichever outcome resolves true.
    pub optimal_allocation: BTreeMap<String, Decimal>,
}

impl IntraPlatformOpportunity {
    /// Expected returns for a given stake.
    #[must_use]
    pub fn returns_for(&self, investment: Decimal) -> InvestmentReturns {
        let allocations: BTreeMap<String, Decimal> = self
            .optimal_allocation
            .iter()
            .map(|(outcome, ratio)| (outcome.clone(), investment * ratio))
            .collect();

        let guaranteed_return = if self.total_cost > Decimal::ZERO {
            investment / self.total_cost
        } else {
            Decimal::ZERO
        };
        let gross_profit = guaranteed_return - investment;
        let fee = guaranteed_return * self.fee_rate;
        let net_profit = gross_profit - fee;
        let roi_pct = if investment > Decimal::ZERO {
            net_profit / investment * dec!(100)
        } else {
            Decimal::ZERO
        };

        InvestmentReturns {
            investment,
            allocations,
            guaranteed_return,
            gross_profit,
            fee,
            net_profit,
            roi_pct,
        }
    }
}

/// Breakdown of an intra-platform stake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentReturns {
    pub investment: Decimal,
    /// Stake per outcome.
    pub allocations: BTreeMap<String, Decimal>,
    /// Payout received whichever outcome wins.
    pub guaranteed_return: Decimal,
    pub gross_profit: Decimal,
    /// Fee charged on the payout.
    pub fee: Decimal,
    pub net_profit: Decimal,
    pub roi_pct: Decimal,
}

// =============================================================================
// Cross-Platform Opportunity
// =============================================================================

/// Cheapest YES on one platform plus cheapest NO on another costs less
/// than the guaranteed $1 payout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossPlatformOpportunity {
    /// The matched event the legs belong to.
    pub event: MatchedEvent,

    /// Platform to buy YES on.
    pub yes_platform: String,
    /// YES price there.
    pub yes_price: Decimal,
    /// Platform to buy NO on; always differs from `yes_platform`.
    pub no_platform: String,
    /// NO price there.
    pub no_price: Decimal,

    /// `yes_price + no_price`; below 1 by construction.
    pub total_cost: Decimal,
    /// Profit before fees, percent of stake.
    pub gross_profit_pct: Decimal,
    /// Profit after the averaged fee, percent of stake.
    pub net_profit_pct: Decimal,

    /// Fee rate of the YES platform.
    pub yes_fee_rate: Decimal,
    /// Fee rate of the NO platform.
    pub no_fee_rate: Decimal,
}

impl CrossPlatformOpportunity {
    /// Expected returns for a given stake, split proportionally between
    /// the two legs. The winning side is unknown in advance, so the two
    /// platforms' fee rates are averaged and charged on the payout.
    #[must_use]
    pub fn returns_for(&self, investment: Decimal) -> CrossReturns {
        let units = if self.total_cost > Decimal::ZERO {
            investment / self.total_cost
        } else {
            Decimal::ZERO
        };

        let yes_stake = units * self.yes_price;
        let no_stake = units * self.no_price;
        let gross_return = units;

        let avg_fee_rate = (self.yes_fee_rate + self.no_fee_rate) / dec!(2);
        let fee = gross_return * avg_fee_rate;
        let net_return = gross_return - fee;
        let net_profit = net_return - investment;
        let roi_pct = if investment > Decimal::ZERO {
            net_profit / investment * dec!(100)
        } else {
            Decimal::ZERO
        };

        CrossReturns {
            investment,
            units,
            yes_stake,
            no_stake,
            gross_return,
            fee,
            net_return,
            net_profit,
            roi_pct,
        }
    }
}

/// Breakdown of a cross-platform stake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossReturns {
    pub investment: Decimal,
    /// Full YES+NO sets purchased.
    pub units: Decimal,
    pub yes_stake: Decimal,
    pub no_stake: Decimal,
    /// $1 per unit, whichever side wins.
    pub gross_return: Decimal,
    pub fee: Decimal,
    pub net_return: Decimal,
    pub net_profit: Decimal,
    pub roi_pct: Decimal,
}

// =============================================================================
// Delta Opportunities
// =============================================================================

/// The delta detector's view of one threshold-bearing binary market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdMarket {
    pub platform: String,
    pub market_id: String,
    pub question: String,
    pub yes_price: Decimal,
    pub no_price: Decimal,
    pub volume: Decimal,
    /// Extracted price threshold in dollars.
    pub threshold: Decimal,
    /// Reach, Dip, or Unknown.
    pub direction: Direction,
    pub topic: Topic,
    pub url: Option<String>,
}

impl ThresholdMarket {
    /// Stable key identifying the underlying market.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.platform, self.market_id)
    }
}

/// Which delta rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaRule {
    /// A higher reach threshold priced above a lower one.
    ReachViolation,
    /// Adjacent reach prices suspiciously close.
    NearMiss,
    /// A deeper dip priced above a shallower one.
    DipViolation,
    /// YES + NO in one market sums well below $1.
    InMarketArbitrage,
}

/// A logical-mispricing opportunity between two threshold markets (or
/// within one, for the in-market rule).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaOpportunity {
    /// The overpriced (or same, for in-market) side.
    pub event_a: ThresholdMarket,
    /// The underpriced side; the one to buy for violations.
    pub event_b: ThresholdMarket,
    pub topic: Topic,
    pub rule: DeltaRule,
    /// Compact statement of the inconsistency.
    pub logic_error: String,
    /// Estimated profit percent; violations are capped at 500.
    pub profit_potential: Decimal,
    /// Confidence in the logic, 1-100.
    pub confidence: u8,
    /// Recommended action.
    pub action: String,
    /// Longer explanation of why the pricing is inconsistent.
    pub explanation: String,
}

impl DeltaOpportunity {
    /// True for the degenerate in-market case where both sides are the
    /// same market.
    #[must_use]
    pub fn is_in_market(&self) -> bool {
        self.event_a.key() == self.event_b.key()
    }
}

// =============================================================================
// Scan Report
// =============================================================================

/// Everything one full scan produced, ranked most profitable first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub intra: Vec<IntraPlatformOpportunity>,
    pub events: Vec<MatchedEvent>,
    pub cross: Vec<CrossPlatformOpportunity>,
    pub delta: Vec<DeltaOpportunity>,
}

impl ScanReport {
    /// Total opportunities across all detectors.
    #[must_use]
    pub fn total_opportunities(&self) -> usize {
        self.intra.len() + self.cross.len() + self.delta.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgescan_core::Outcome;

    fn market(platform: &str, yes: Decimal, no: Decimal) -> NormalizedMarket {
        NormalizedMarket {
            platform: platform.to_string(),
            market_id: format!("{platform}-1"),
            question: "Will it happen?".to_string(),
            outcomes: vec![Outcome::new("Yes", yes), Outcome::new("No", no)],
            volume: dec!(10000),
            liquidity: Decimal::ZERO,
            end_date: None,
            active: true,
            resolved: false,
            category: Category::Other,
            url: None,
        }
    }

    fn event(markets: Vec<NormalizedMarket>) -> MatchedEvent {
        MatchedEvent {
            name: "Will it happen?".to_string(),
            category: Category::Other,
            markets: markets.into_iter().map(|m| (m.platform.clone(), m)).collect(),
            keywords: BTreeSet::new(),
            confidence: 0.8,
            match_reason: String::new(),
        }
    }

    // ==================== MatchedEvent Tests ====================

    #[test]
    fn test_event_prices_and_best_buy() {
        let event = event(vec![
            market("alpha", dec!(0.55), dec!(0.47)),
            market("beta", dec!(0.50), dec!(0.52)),
        ]);

        assert_eq!(event.num_platforms(), 2);
        assert_eq!(event.best_buy("Yes"), Some(("beta", dec!(0.50))));
        assert_eq!(event.best_sell("Yes"), Some(("alpha", dec!(0.55))));
        assert_eq!(event.price_spread("Yes"), dec!(0.05));
    }

    #[test]
    fn test_event_spread_zero_with_one_platform() {
        let event = event(vec![market("alpha", dec!(0.55), dec!(0.47))]);
        assert_eq!(event.price_spread("Yes"), Decimal::ZERO);
    }

    // ==================== Intra Returns Tests ====================

    #[test]
    fn test_intra_returns_breakdown() {
        let m = market("polymarket", dec!(0.40), dec!(0.55));
        let mut allocation = BTreeMap::new();
        allocation.insert("Yes".to_string(), dec!(0.40) / dec!(0.95));
        allocation.insert("No".to_string(), dec!(0.55) / dec!(0.95));

        let opp = IntraPlatformOpportunity {
            market: m,
            kind: MarketKind::Binary,
            total_cost: dec!(0.95),
            gross_profit_pct: dec!(5.26),
            net_profit_pct: dec!(3.16),
            fee_rate: dec!(0.02),
            optimal_allocation: allocation,
        };

        let returns = opp.returns_for(dec!(100));
        // $100 / 0.95 = $105.26... guaranteed back.
        assert!(returns.guaranteed_return > dec!(105.26));
        assert!(returns.guaranteed_return < dec!(105.27));
        // Fee on the payout.
        assert!(returns.fee > dec!(2.10) && returns.fee < dec!(2.11));
        assert!(returns.net_profit > dec!(3.15) && returns.net_profit < dec!(3.17));
        assert_eq!(returns.roi_pct, returns.net_profit); // investment = 100
    }

    // ==================== Cross Returns Tests ====================

    #[test]
    fn test_cross_returns_breakdown() {
        let e = event(vec![
            market("alpha", dec!(0.50), dec!(0.52)),
            market("beta", dec!(0.55), dec!(0.47)),
        ]);

        let opp = CrossPlatformOpportunity {
            event: e,
            yes_platform: "alpha".to_string(),
            yes_price: dec!(0.50),
            no_platform: "beta".to_string(),
            no_price: dec!(0.47),
            total_cost: dec!(0.97),
            gross_profit_pct: dec!(3.09),
            net_profit_pct: dec!(1.55),
            yes_fee_rate: dec!(0.02),
            no_fee_rate: dec!(0.01),
        };

        let returns = opp.returns_for(dec!(97));
        assert_eq!(returns.units, dec!(100));
        assert_eq!(returns.yes_stake, dec!(50));
        assert_eq!(returns.no_stake, dec!(47));
        assert_eq!(returns.gross_return, dec!(100));
        // Averaged fee: 1.5% of $100.
        assert_eq!(returns.fee, dec!(1.5));
        assert_eq!(returns.net_profit, dec!(1.5));
    }

    // ==================== Delta Tests ====================

    fn threshold_market(id: &str, threshold: Decimal, yes: Decimal) -> ThresholdMarket {
        ThresholdMarket {
            platform: "polymarket".to_string(),
            market_id: id.to_string(),
            question: format!("Will BTC reach ${threshold}?"),
            yes_price: yes,
            no_price: Decimal::ONE - yes,
            volume: dec!(10000),
            threshold,
            direction: Direction::Reach,
            topic: Topic::Btc,
            url: None,
        }
    }

    #[test]
    fn test_delta_in_market_detection() {
        let m = threshold_market("a", dec!(100000), dec!(0.4));
        let opp = DeltaOpportunity {
            event_a: m.clone(),
            event_b: m,
            topic: Topic::Btc,
            rule: DeltaRule::InMarketArbitrage,
            logic_error: String::new(),
            profit_potential: dec!(11.1),
            confidence: 95,
            action: String::new(),
            explanation: String::new(),
        };
        assert!(opp.is_in_market());
    }

    #[test]
    fn test_delta_pair_is_not_in_market() {
        let opp = DeltaOpportunity {
            event_a: threshold_market("a", dec!(150000), dec!(0.3)),
            event_b: threshold_market("b", dec!(100000), dec!(0.2)),
            topic: Topic::Btc,
            rule: DeltaRule::ReachViolation,
            logic_error: String::new(),
            profit_potential: dec!(50),
            confidence: 90,
            action: String::new(),
            explanation: String::new(),
        };
        assert!(!opp.is_in_market());
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_total() {
        let report = ScanReport::default();
        assert_eq!(report.total_opportunities(), 0);
    }

    #[test]
    fn test_report_serialization_round_trip() {
        let report = ScanReport::default();
        let json = serde_json::to_string(&report).unwrap();
        let back: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_opportunities(), 0);
    }
}
