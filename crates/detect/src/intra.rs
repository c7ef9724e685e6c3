//! Intra-platform arbitrage detection.
//!
//! If buying every outcome of one market costs less than $1, the $1 payout
//! of the winning outcome is a guaranteed profit. Example: YES at 40c and
//! NO at 55c cost 95c together and always pay out $1.

use std::collections::BTreeMap;

use edgescan_core::{NormalizedMarket, ScanConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, trace};

use crate::types::{IntraPlatformOpportunity, MarketKind};

/// Detects arbitrage within a single market.
#[derive(Debug, Clone)]
pub struct IntraPlatformDetector {
    config: ScanConfig,
}

impl IntraPlatformDetector {
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

    /// Evaluates one market.
    ///
    /// Emits an opportunity only when the market is open, has at least 2
    /// outcomes, the total cost is below $1, and the net profit after the
    /// platform's fee on winnings exceeds the configured threshold.
    #[must_use]
    pub fn evaluate(&self, market: &NormalizedMarket) -> Option<IntraPlatformOpportunity> {
        if market.resolved || !market.active {
            return None;
        }
        if market.outcomes.len() < 2 {
            return None;
        }

        let total_cost = market.total_price();
        if total_cost >= Decimal::ONE || total_cost <= Decimal::ZERO {
            trace!(
                market = %market.key(),
                %total_cost,
                "no arbitrage in outcome prices"
            );
            return None;
        }

        let gross_profit_pct = (Decimal::ONE - total_cost) / total_cost * dec!(100);

        // The fee is charged on the payout, not the stake: every dollar
        // staked pays out 1/total_cost dollars.
        let fee_rate = self.config.fee_for(&market.platform);
        let fee_pct = fee_rate * (Decimal::ONE / total_cost) * dec!(100);
        let net_profit_pct = gross_profit_pct - fee_pct;

        if net_profit_pct <= self.config.min_profit_pct {
            trace!(
                market = %market.key(),
                %net_profit_pct,
                threshold = %self.config.min_profit_pct,
                "net profit below threshold"
            );
            return None;
        }

        // Staking price/total_cost of the bankroll on each outcome pays
        // out exactly $1 per total_cost staked, whichever outcome wins.
        let optimal_allocation: BTreeMap<String, Decimal> = market
            .outcomes
            .iter()
            .map(|o| (o.name.clone(), o.price / total_cost))
            .collect();

        let kind = if market.outcomes.len() == 2 {
            MarketKind::Binary
        } else {
            MarketKind::MultiOutcome
        };

        debug!(
            market = %market.key(),
            %total_cost,
            %gross_profit_pct,
            %net_profit_pct,
            "intra-platform arbitrage found"
        );

        Some(IntraPlatformOpportunity {
            market: market.clone(),
            kind,
            total_cost,
            gross_profit_pct,
            net_profit_pct,
            fee_rate,
            optimal_allocation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgescan_core::{Category, Outcome};

    fn detector() -> IntraPlatformDetector {
        IntraPlatformDetector::new(ScanConfig::default())
    }

    fn market(outcomes: Vec<Outcome>) -> NormalizedMarket {
        NormalizedMarket {
            platform: "polymarket".to_string(),
            market_id: "m1".to_string(),
            question: "Will it happen?".to_string(),
            outcomes,
            volume: dec!(10000),
            liquidity: Decimal::ZERO,
            end_date: None,
            active: true,
            resolved: false,
            category: Category::Other,
            url: None,
        }
    }

    fn binary(yes: Decimal, no: Decimal) -> NormalizedMarket {
        market(vec![Outcome::new("Yes", yes), Outcome::new("No", no)])
    }

    // ==================== Emission Tests ====================

    #[test]
    fn test_end_to_end_scenario() {
        // YES 0.40 + NO 0.55 with a 2% fee on winnings.
        let opp = detector().evaluate(&binary(dec!(0.40), dec!(0.55))).unwrap();

        assert_eq!(opp.total_cost, dec!(0.95));
        assert_eq!(opp.kind, MarketKind::Binary);

        // Gross: (1 - 0.95) / 0.95 * 100 = 5.263...%
        assert!(opp.gross_profit_pct > dec!(5.26) && opp.gross_profit_pct < dec!(5.27));
        // Fee: 0.02 * (1/0.95) * 100 = 2.105...%
        // Net: 5.263 - 2.105 = 3.157...%
        assert!(opp.net_profit_pct > dec!(3.15) && opp.net_profit_pct < dec!(3.16));
    }

    #[test]
    fn test_allocation_sums_to_one_and_guarantees_payout() {
        let opp = detector().evaluate(&binary(dec!(0.40), dec!(0.55))).unwrap();

        let total: Decimal = opp.optimal_allocation.values().copied().sum();
        assert_eq!(total, Decimal::ONE);

        // Staking total_cost dollars per the allocation buys $1 of payout
        // on each outcome: stake_i recovers price_i within rounding.
        for outcome in &opp.market.outcomes {
            let stake = opp.optimal_allocation[&outcome.name] * opp.total_cost;
            assert!((stake - outcome.price).abs() < dec!(0.0000000001));
        }
    }

    #[test]
    fn test_no_false_positive_at_or_above_one() {
        assert!(detector().evaluate(&binary(dec!(0.50), dec!(0.50))).is_none());
        assert!(detector().evaluate(&binary(dec!(0.60), dec!(0.55))).is_none());
    }

    #[test]
    fn test_rejects_resolved_and_inactive() {
        let mut resolved = binary(dec!(0.40), dec!(0.55));
        resolved.resolved = true;
        assert!(detector().evaluate(&resolved).is_none());

        let mut inactive = binary(dec!(0.40), dec!(0.55));
        inactive.active = false;
        assert!(detector().evaluate(&inactive).is_none());
    }

    #[test]
    fn test_rejects_single_outcome() {
        let single = market(vec![Outcome::new("Yes", dec!(0.4))]);
        assert!(detector().evaluate(&single).is_none());
    }

    #[test]
    fn test_rejects_zero_cost_market() {
        // All-zero prices must not divide by zero.
        assert!(detector()
            .evaluate(&binary(Decimal::ZERO, Decimal::ZERO))
            .is_none());
    }

    #[test]
    fn test_net_profit_threshold_gates_emission() {
        // 0.49 + 0.50 = 0.99: gross 1.01%, fee 2.02%, net negative.
        assert!(detector().evaluate(&binary(dec!(0.49), dec!(0.50))).is_none());

        // Same prices with a high threshold and no fee still gated.
        let config = ScanConfig::default().with_min_profit_pct(dec!(50));
        let detector = IntraPlatformDetector::new(config);
        assert!(detector.evaluate(&binary(dec!(0.40), dec!(0.55))).is_none());
    }

    #[test]
    fn test_multi_outcome_market() {
        let opp = detector()
            .evaluate(&market(vec![
                Outcome::new("Alice", dec!(0.30)),
                Outcome::new("Bob", dec!(0.30)),
                Outcome::new("Carol", dec!(0.30)),
            ]))
            .unwrap();

        assert_eq!(opp.kind, MarketKind::MultiOutcome);
        assert_eq!(opp.total_cost, dec!(0.90));
        let total: Decimal = opp.optimal_allocation.values().copied().sum();
        assert_eq!(total, Decimal::ONE);
    }

    #[test]
    fn test_fee_rate_comes_from_platform_config() {
        // Kalshi charges 1%, so the same prices net more there.
        let mut kalshi = binary(dec!(0.40), dec!(0.55));
        kalshi.platform = "kalshi".to_string();

        let poly_opp = detector().evaluate(&binary(dec!(0.40), dec!(0.55))).unwrap();
        let kalshi_opp = detector().evaluate(&kalshi).unwrap();

        assert_eq!(poly_opp.fee_rate, dec!(0.02));
        assert_eq!(kalshi_opp.fee_rate, dec!(0.01));
        assert!(kalshi_opp.net_profit_pct > poly_opp.net_profit_pct);
    }

    #[test]
    fn test_idempotent_over_same_input() {
        let market = binary(dec!(0.40), dec!(0.55));
        let first = detector().evaluate(&market).unwrap();
        let second = detector().evaluate(&market).unwrap();
        assert_eq!(first.total_cost, second.total_cost);
        assert_eq!(first.net_profit_pct, second.net_profit_pct);
        assert_eq!(first.optimal_allocation, second.optimal_allocation);
    }
}
