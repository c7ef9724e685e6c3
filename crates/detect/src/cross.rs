//! Cross-platform arbitrage detection.
//!
//! For a matched event, buying the cheapest YES on one platform and the
//! cheapest NO on another guarantees a $1 payout per set. When the two
//! legs together cost less than $1, the difference is locked in whichever
//! way the event resolves.

use edgescan_core::ScanConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, trace};

use crate::types::{CrossPlatformOpportunity, MatchedEvent};

/// Detects arbitrage across the platforms of one matched event.
#[derive(Debug, Clone)]
pub struct CrossPlatformDetector {
    config: ScanConfig,
}

impl CrossPlatformDetector {
    /// Creates a detector with the given configuration.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Evaluates one matched event.
    ///
    /// Only the single best YES / best NO pair is considered. Non-binary
    /// markets are skipped silently. When both legs land on the same
    /// platform the pair belongs to intra-platform detection and nothing
    /// is emitted here, even if the total is below $1.
    #[must_use]
    pub fn evaluate(&self, event: &MatchedEvent) -> Option<CrossPlatformOpportunity> {
        let mut yes_prices: Vec<(&str, Decimal)> = Vec::new();
        let mut no_prices: Vec<(&str, Decimal)> = Vec::new();

        for (platform, market) in &event.markets {
            if !market.is_binary() {
                continue;
            }
            if let Some(yes) = market.yes_price().filter(|p| *p > Decimal::ZERO) {
                yes_prices.push((platform.as_str(), yes));
            }
            if let Some(no) = market.no_price().filter(|p| *p > Decimal::ZERO) {
                no_prices.push((platform.as_str(), no));
            }
        }

        if yes_prices.is_empty() || no_prices.is_empty() {
            return None;
        }

        // Cheapest leg on each side, independently.
        let (yes_platform, yes_price) = yes_prices
            .into_iter()
            .min_by(|a, b| a.1.cmp(&b.1))?;
        let (no_platform, no_price) = no_prices
            .into_iter()
            .min_by(|a, b| a.1.cmp(&b.1))?;

        let total_cost = yes_price + no_price;
        if total_cost >= Decimal::ONE {
            trace!(
                event = %event.name,
                %total_cost,
                "combined legs cost $1 or more"
            );
            return None;
        }

        if yes_platform == no_platform {
            trace!(
                event = %event.name,
                platform = yes_platform,
                "both legs on one platform, intra-platform territory"
            );
            return None;
        }

        let yes_fee_rate = self.config.fee_for(yes_platform);
        let no_fee_rate = self.config.fee_for(no_platform);

        let gross_profit = Decimal::ONE - total_cost;
        let gross_profit_pct = gross_profit / total_cost * dec!(100);

        // The winning side is unknown in advance, so the fee on the $1
        // payout is approximated by averaging the two platforms' rates.
        let avg_fee = (yes_fee_rate + no_fee_rate) / dec!(2);
        let net_profit = gross_profit - avg_fee;
        let net_profit_pct = net_profit / total_cost * dec!(100);

        if net_profit_pct <= self.config.min_profit_pct {
            trace!(
                event = %event.name,
                %net_profit_pct,
                threshold = %self.config.min_profit_pct,
                "net profit below threshold"
            );
            return None;
        }

        debug!(
            event = %event.name,
            yes_platform,
            %yes_price,
            no_platform,
            %no_price,
            %total_cost,
            %net_profit_pct,
            "cross-platform arbitrage found"
        );

        Some(CrossPlatformOpportunity {
            event: event.clone(),
            yes_platform: yes_platform.to_string(),
            yes_price,
            no_platform: no_platform.to_string(),
            no_price,
            total_cost,
            gross_profit_pct,
            net_profit_pct,
            yes_fee_rate,
            no_fee_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgescan_core::{Category, NormalizedMarket, Outcome};
    use std::collections::BTreeSet;

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
            confidence: 0.9,
            match_reason: String::new(),
        }
    }

    fn detector() -> CrossPlatformDetector {
        CrossPlatformDetector::new(ScanConfig::default())
    }

    // ==================== Emission Tests ====================

    #[test]
    fn test_end_to_end_scenario() {
        // Platform A: YES 0.50 / NO 0.52, platform B: YES 0.55 / NO 0.47.
        let event = event(vec![
            market("alpha", dec!(0.50), dec!(0.52)),
            market("beta", dec!(0.55), dec!(0.47)),
        ]);

        let opp = detector().evaluate(&event).unwrap();

        assert_eq!(opp.yes_platform, "alpha");
        assert_eq!(opp.yes_price, dec!(0.50));
        assert_eq!(opp.no_platform, "beta");
        assert_eq!(opp.no_price, dec!(0.47));
        assert_eq!(opp.total_cost, dec!(0.97));
        assert!(opp.net_profit_pct > Decimal::ZERO);
    }

    #[test]
    fn test_same_platform_pair_is_excluded() {
        // Alpha is cheapest on both sides and alone sums below $1; the
        // cross detector must not claim it.
        let event = event(vec![
            market("alpha", dec!(0.40), dec!(0.45)),
            market("beta", dec!(0.60), dec!(0.55)),
        ]);

        assert!(detector().evaluate(&event).is_none());
    }

    #[test]
    fn test_total_at_or_above_one_is_rejected() {
        let event = event(vec![
            market("alpha", dec!(0.50), dec!(0.55)),
            market("beta", dec!(0.52), dec!(0.50)),
        ]);
        // Best YES 0.50 (alpha) + best NO 0.50 (beta) = 1.00.
        assert!(detector().evaluate(&event).is_none());
    }

    #[test]
    fn test_fee_averaging() {
        let mut config = ScanConfig::default();
        config.fees.insert("alpha".to_string(), dec!(0.02));
        config.fees.insert("beta".to_string(), dec!(0.04));
        let detector = CrossPlatformDetector::new(config);

        let event = event(vec![
            market("alpha", dec!(0.40), dec!(0.60)),
            market("beta", dec!(0.70), dec!(0.40)),
        ]);

        let opp = detector.evaluate(&event).unwrap();
        // total 0.80, gross profit 0.20, avg fee (0.02+0.04)/2 = 0.03.
        // net = (0.20 - 0.03) / 0.80 * 100 = 21.25%.
        assert_eq!(opp.total_cost, dec!(0.80));
        assert_eq!(opp.net_profit_pct, dec!(21.25));
        assert_eq!(opp.yes_fee_rate, dec!(0.02));
        assert_eq!(opp.no_fee_rate, dec!(0.04));
    }

    #[test]
    fn test_non_binary_markets_are_skipped() {
        let multi = NormalizedMarket {
            outcomes: vec![
                Outcome::new("Alice", dec!(0.10)),
                Outcome::new("Bob", dec!(0.10)),
                Outcome::new("Carol", dec!(0.10)),
            ],
            ..market("alpha", dec!(0.5), dec!(0.5))
        };
        let event = event(vec![multi, market("beta", dec!(0.55), dec!(0.47))]);

        // Only beta remains, so both legs land on it: excluded.
        assert!(detector().evaluate(&event).is_none());
    }

    #[test]
    fn test_zero_prices_are_ignored() {
        let event = event(vec![
            market("alpha", Decimal::ZERO, dec!(0.47)),
            market("beta", dec!(0.50), dec!(0.52)),
        ]);

        let opp = detector().evaluate(&event).unwrap();
        // Alpha's zero YES is not a real quote; YES comes from beta.
        assert_eq!(opp.yes_platform, "beta");
        assert_eq!(opp.no_platform, "alpha");
    }

    #[test]
    fn test_single_platform_event_yields_nothing() {
        let event = event(vec![market("alpha", dec!(0.40), dec!(0.45))]);
        assert!(detector().evaluate(&event).is_none());
    }

    #[test]
    fn test_net_threshold_gates_emission() {
        let config = ScanConfig::default().with_min_profit_pct(dec!(50));
        let detector = CrossPlatformDetector::new(config);

        let event = event(vec![
            market("alpha", dec!(0.50), dec!(0.52)),
            market("beta", dec!(0.55), dec!(0.47)),
        ]);
        assert!(detector.evaluate(&event).is_none());
    }

    #[test]
    fn test_idempotent_over_same_event() {
        let event = event(vec![
            market("alpha", dec!(0.50), dec!(0.52)),
            market("beta", dec!(0.55), dec!(0.47)),
        ]);

        let first = detector().evaluate(&event).unwrap();
        let second = detector().evaluate(&event).unwrap();
        assert_eq!(first.total_cost, second.total_cost);
        assert_eq!(first.net_profit_pct, second.net_profit_pct);
    }
}
