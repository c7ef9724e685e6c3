//! Delta/logical-mispricing detection.
//!
//! Within one topic, threshold markets imply an ordering on their YES
//! prices: reaching $150K implies having reached $100K, so the $100K YES
//! can never be worth less than the $150K YES. Dips mirror this the other
//! way. Violations of that ordering, plus two advisory rules, are the
//! opportunities emitted here.

use std::collections::BTreeMap;

use edgescan_core::{DeltaConfig, NormalizedMarket};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::keywords::{Direction, ThresholdExtractor, Topic};
use crate::types::{DeltaOpportunity, DeltaRule, ThresholdMarket};

/// Hard floor for the divisor in profit estimates.
const PROFIT_DIVISOR_FLOOR: Decimal = dec!(0.01);

/// Profit-estimate cap for ordering violations, in percent.
const PROFIT_CAP: Decimal = dec!(500);

/// YES prices at or below this are treated as dust, not real quotes.
const PRICE_DUST: Decimal = dec!(0.001);

/// Detects logical mispricing within topic groups of threshold markets.
#[derive(Debug, Clone)]
pub struct DeltaDetector {
    config: DeltaConfig,
    thresholds: ThresholdExtractor,
}

impl DeltaDetector {
    /// Creates a detector with the given tunables.
    #[must_use]
    pub fn new(config: DeltaConfig) -> Self {
        Self {
            config,
            thresholds: ThresholdExtractor::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DeltaConfig {
        &self.config
    }

    /// Builds topic groups from a snapshot.
    ///
    /// Only open binary markets with an extractable threshold and at
    /// least the configured group volume qualify; everything else is
    /// silently left out.
    #[must_use]
    pub fn prepare(&self, markets: &[NormalizedMarket]) -> BTreeMap<Topic, Vec<ThresholdMarket>> {
        let mut groups: BTreeMap<Topic, Vec<ThresholdMarket>> = BTreeMap::new();

        for market in markets {
            if !market.is_open() || !market.is_binary() {
                continue;
            }
            if market.volume < self.config.min_group_volume {
                continue;
            }
            let Some(threshold) = self.thresholds.extract(&market.question) else {
                continue;
            };
            let (Some(yes_price), Some(no_price)) = (market.yes_price(), market.no_price())
            else {
                continue;
            };

            let topic = Topic::infer(&market.question);
            groups.entry(topic).or_default().push(ThresholdMarket {
                platform: market.platform.clone(),
                market_id: market.market_id.clone(),
                question: market.question.clone(),
                yes_price,
                no_price,
                volume: market.volume,
                threshold,
                direction: Direction::extract(&market.question),
                topic,
                url: market.url.clone(),
            });
        }

        groups
    }

    /// Runs every rule over every topic group and ranks the results by
    /// profit potential. Topics are a hard pre-filter: no rule ever
    /// compares markets across groups.
    #[must_use]
    pub fn scan(&self, groups: &BTreeMap<Topic, Vec<ThresholdMarket>>) -> Vec<DeltaOpportunity> {
        let mut opportunities = Vec::new();
        for (topic, group) in groups {
            opportunities.extend(self.scan_topic(*topic, group));
        }

        opportunities.sort_by(|a, b| b.profit_potential.cmp(&a.profit_potential));
        info!(found = opportunities.len(), "delta scan complete");
        opportunities
    }

    /// Applies all four rules to one topic group.
    #[must_use]
    pub fn scan_topic(&self, topic: Topic, group: &[ThresholdMarket]) -> Vec<DeltaOpportunity> {
        let mut opportunities = Vec::new();
        self.scan_reach(topic, group, &mut opportunities);
        self.scan_dip(topic, group, &mut opportunities);
        self.scan_in_market(topic, group, &mut opportunities);
        opportunities
    }

    /// Rules 1 and 2: reach-direction ordering violations and near-miss
    /// advisories over adjacent threshold pairs.
    fn scan_reach(&self, topic: Topic, group: &[ThresholdMarket], out: &mut Vec<DeltaOpportunity>) {
        let mut reach: Vec<&ThresholdMarket> = group
            .iter()
            .filter(|m| m.direction == Direction::Reach)
            .collect();
        reach.sort_by(|a, b| a.threshold.cmp(&b.threshold));

        for pair in reach.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);

            // Near-equal thresholds are the same question in disguise.
            if lower.threshold <= Decimal::ZERO
                || higher.threshold / lower.threshold < self.config.adjacent_ratio
            {
                continue;
            }

            if higher.yes_price > lower.yes_price && lower.yes_price > PRICE_DUST {
                let diff = higher.yes_price - lower.yes_price;
                let profit =
                    (diff / lower.yes_price.max(PROFIT_DIVISOR_FLOOR) * dec!(100)).min(PROFIT_CAP);

                debug!(
                    %topic,
                    lower_threshold = %lower.threshold,
                    higher_threshold = %higher.threshold,
                    "reach ordering violation"
                );

                out.push(DeltaOpportunity {
                    event_a: higher.clone(),
                    event_b: lower.clone(),
                    topic,
                    rule: DeltaRule::ReachViolation,
                    logic_error: format!(
                        "${} YES ({}) > ${} YES ({})",
                        higher.threshold, higher.yes_price, lower.threshold, lower.yes_price
                    ),
                    profit_potential: profit,
                    confidence: 90,
                    action: format!("BUY '{}' YES", truncate(&lower.question, 40)),
                    explanation: format!(
                        "If {} reaches ${}, it must pass ${} on the way. The market \
                         prices ${} at {} but ${} at {}, so the lower threshold is \
                         underpriced.",
                        topic,
                        higher.threshold,
                        lower.threshold,
                        higher.threshold,
                        higher.yes_price,
                        lower.threshold,
                        lower.yes_price
                    ),
                });
            } else if (higher.yes_price - lower.yes_price).abs() < self.config.near_miss_gap
                && lower.yes_price > self.config.near_miss_floor
            {
                out.push(DeltaOpportunity {
                    event_a: higher.clone(),
                    event_b: lower.clone(),
                    topic,
                    rule: DeltaRule::NearMiss,
                    logic_error: format!(
                        "${} and ${} priced almost identically",
                        higher.threshold, lower.threshold
                    ),
                    profit_potential: dec!(5),
                    confidence: 60,
                    action: "Watch for the spread to widen".to_string(),
                    explanation: format!(
                        "${} is easier to reach than ${}, yet the YES prices are \
                         {} vs {}. The gap should widen as the market corrects.",
                        lower.threshold, higher.threshold, lower.yes_price, higher.yes_price
                    ),
                });
            }
        }
    }

    /// Rule 3: dip-direction ordering violations. Dipping to a lower
    /// level implies dipping to every higher level first, so the lower
    /// threshold's YES can never be worth more.
    fn scan_dip(&self, topic: Topic, group: &[ThresholdMarket], out: &mut Vec<DeltaOpportunity>) {
        let mut dips: Vec<&ThresholdMarket> = group
            .iter()
            .filter(|m| m.direction == Direction::Dip)
            .collect();
        dips.sort_by(|a, b| a.threshold.cmp(&b.threshold));

        for pair in dips.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);

            if lower.yes_price > higher.yes_price && higher.yes_price > PRICE_DUST {
                let diff = lower.yes_price - higher.yes_price;
                let profit =
                    (diff / higher.yes_price.max(PROFIT_DIVISOR_FLOOR) * dec!(100)).min(PROFIT_CAP);

                debug!(
                    %topic,
                    lower_threshold = %lower.threshold,
                    higher_threshold = %higher.threshold,
                    "dip ordering violation"
                );

                out.push(DeltaOpportunity {
                    event_a: lower.clone(),
                    event_b: higher.clone(),
                    topic,
                    rule: DeltaRule::DipViolation,
                    logic_error: format!(
                        "Dip ${} YES ({}) > dip ${} YES ({})",
                        lower.threshold, lower.yes_price, higher.threshold, higher.yes_price
                    ),
                    profit_potential: profit,
                    confidence: 85,
                    action: format!("BUY 'Dip to ${}' YES", higher.threshold),
                    explanation: format!(
                        "If {} falls to ${}, it must fall through ${} first. The \
                         deeper dip is priced at {} against {}, so the shallower \
                         dip is underpriced.",
                        topic,
                        lower.threshold,
                        higher.threshold,
                        lower.yes_price,
                        higher.yes_price
                    ),
                });
            }
        }
    }

    /// Rule 4: YES + NO inside one market summing well below $1 on real
    /// volume is plain arbitrage, reusing the pair record shape with both
    /// sides pointing at the same market.
    fn scan_in_market(
        &self,
        topic: Topic,
        group: &[ThresholdMarket],
        out: &mut Vec<DeltaOpportunity>,
    ) {
        for market in group {
            let total = market.yes_price + market.no_price;
            if total <= Decimal::ZERO || total >= self.config.in_market_total {
                continue;
            }
            if market.volume <= self.config.in_market_min_volume {
                continue;
            }

            let profit = (Decimal::ONE - total) / total * dec!(100);
            out.push(DeltaOpportunity {
                event_a: market.clone(),
                event_b: market.clone(),
                topic,
                rule: DeltaRule::InMarketArbitrage,
                logic_error: format!("YES+NO = {total} < 1.00"),
                profit_potential: profit,
                confidence: 95,
                action: format!(
                    "BUY BOTH: YES ({}) + NO ({})",
                    market.yes_price, market.no_price
                ),
                explanation: format!(
                    "YES plus NO always pays out $1, but buying both costs {total}. \
                     The difference is locked in whichever way it resolves.",
                ),
            });
        }
    }
}

/// Truncates on a character boundary.
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgescan_core::{Category, Outcome};

    fn detector() -> DeltaDetector {
        DeltaDetector::new(DeltaConfig::default())
    }

    fn threshold_market(
        id: &str,
        threshold: Decimal,
        direction: Direction,
        yes: Decimal,
    ) -> ThresholdMarket {
        ThresholdMarket {
            platform: "polymarket".to_string(),
            market_id: id.to_string(),
            question: format!("threshold market {id}"),
            yes_price: yes,
            no_price: Decimal::ONE - yes,
            volume: dec!(10000),
            threshold,
            direction,
            topic: Topic::Btc,
            url: None,
        }
    }

    fn reach(id: &str, threshold: Decimal, yes: Decimal) -> ThresholdMarket {
        threshold_market(id, threshold, Direction::Reach, yes)
    }

    fn dip(id: &str, threshold: Decimal, yes: Decimal) -> ThresholdMarket {
        threshold_market(id, threshold, Direction::Dip, yes)
    }

    fn violations(opps: &[DeltaOpportunity], rule: DeltaRule) -> usize {
        opps.iter().filter(|o| o.rule == rule).count()
    }

    // ==================== Reach Rule Tests ====================

    #[test]
    fn test_consistent_reach_prices_emit_nothing() {
        // T1 < T2 < T3 with strictly decreasing YES: logically sound.
        let group = vec![
            reach("a", dec!(100000), dec!(0.5)),
            reach("b", dec!(150000), dec!(0.3)),
            reach("c", dec!(200000), dec!(0.1)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(violations(&opps, DeltaRule::ReachViolation), 0);
    }

    #[test]
    fn test_backwards_reach_prices_emit_one_per_adjacent_pair() {
        // Increasing YES over increasing thresholds: both adjacent pairs
        // violate the ordering.
        let group = vec![
            reach("a", dec!(100000), dec!(0.1)),
            reach("b", dec!(150000), dec!(0.3)),
            reach("c", dec!(200000), dec!(0.5)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(violations(&opps, DeltaRule::ReachViolation), 2);
    }

    #[test]
    fn test_reach_violation_profit_and_action() {
        let group = vec![
            reach("a", dec!(100000), dec!(0.20)),
            reach("b", dec!(150000), dec!(0.30)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(opps.len(), 1);
        let opp = &opps[0];

        assert_eq!(opp.rule, DeltaRule::ReachViolation);
        // (0.30 - 0.20) / 0.20 * 100 = 50%.
        assert_eq!(opp.profit_potential, dec!(50));
        assert_eq!(opp.confidence, 90);
        // The underpriced lower threshold is the one to buy.
        assert_eq!(opp.event_b.market_id, "a");
        assert!(opp.action.contains("YES"));
        assert!(!opp.is_in_market());
    }

    #[test]
    fn test_reach_profit_capped_at_500() {
        let group = vec![
            reach("a", dec!(100000), dec!(0.01)),
            reach("b", dec!(150000), dec!(0.90)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(opps[0].profit_potential, dec!(500));
    }

    #[test]
    fn test_reach_skips_near_equal_thresholds() {
        // 105/100 = 1.05 < 1.1: same question in disguise, skipped.
        let group = vec![
            reach("a", dec!(100000), dec!(0.20)),
            reach("b", dec!(105000), dec!(0.35)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(violations(&opps, DeltaRule::ReachViolation), 0);
    }

    #[test]
    fn test_reach_ignores_dust_prices() {
        let group = vec![
            reach("a", dec!(100000), dec!(0.0005)),
            reach("b", dec!(150000), dec!(0.10)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(violations(&opps, DeltaRule::ReachViolation), 0);
    }

    // ==================== Near-Miss Rule Tests ====================

    #[test]
    fn test_near_miss_advisory() {
        // Prices 1 point apart, lower above the 5% floor, no violation.
        let group = vec![
            reach("a", dec!(100000), dec!(0.30)),
            reach("b", dec!(150000), dec!(0.29)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].rule, DeltaRule::NearMiss);
        assert_eq!(opps[0].profit_potential, dec!(5));
        assert_eq!(opps[0].confidence, 60);
    }

    #[test]
    fn test_near_miss_only_when_violation_does_not_fire() {
        // higher > lower by 1 point: a hard violation, not a near-miss,
        // even though the gap is under 2 points.
        let group = vec![
            reach("a", dec!(100000), dec!(0.30)),
            reach("b", dec!(150000), dec!(0.31)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(violations(&opps, DeltaRule::ReachViolation), 1);
        assert_eq!(violations(&opps, DeltaRule::NearMiss), 0);
    }

    #[test]
    fn test_near_miss_needs_floor() {
        // Lower price at 3% is under the 5% floor: no advisory.
        let group = vec![
            reach("a", dec!(100000), dec!(0.03)),
            reach("b", dec!(150000), dec!(0.025)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert!(opps.is_empty());
    }

    // ==================== Dip Rule Tests ====================

    #[test]
    fn test_dip_violation() {
        // Dipping to $50K implies dipping to $70K, so $50K YES must not
        // exceed $70K YES.
        let group = vec![
            dip("a", dec!(50000), dec!(0.30)),
            dip("b", dec!(70000), dec!(0.20)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(opps.len(), 1);
        let opp = &opps[0];

        assert_eq!(opp.rule, DeltaRule::DipViolation);
        // (0.30 - 0.20) / 0.20 * 100 = 50%.
        assert_eq!(opp.profit_potential, dec!(50));
        assert_eq!(opp.confidence, 85);
        // Buy the shallower (higher-threshold) dip.
        assert_eq!(opp.event_b.market_id, "b");
    }

    #[test]
    fn test_consistent_dip_prices_emit_nothing() {
        let group = vec![
            dip("a", dec!(50000), dec!(0.10)),
            dip("b", dec!(70000), dec!(0.25)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(violations(&opps, DeltaRule::DipViolation), 0);
    }

    #[test]
    fn test_dip_has_no_ratio_gate() {
        // Thresholds 3% apart still compare for dips.
        let group = vec![
            dip("a", dec!(50000), dec!(0.30)),
            dip("b", dec!(51500), dec!(0.20)),
        ];

        let opps = detector().scan_topic(Topic::Btc, &group);
        assert_eq!(violations(&opps, DeltaRule::DipViolation), 1);
    }

    // ==================== In-Market Rule Tests ====================

    #[test]
    fn test_in_market_arbitrage() {
        let mut market = reach("a", dec!(100000), dec!(0.40));
        market.no_price = dec!(0.50); // total 0.90 < 0.95
        market.volume = dec!(6000);

        let opps = detector().scan_topic(Topic::Btc, &[market]);
        assert_eq!(opps.len(), 1);
        let opp = &opps[0];

        assert_eq!(opp.rule, DeltaRule::InMarketArbitrage);
        assert!(opp.is_in_market());
        assert_eq!(opp.confidence, 95);
        // (1 - 0.90) / 0.90 * 100 = 11.11...%
        assert!(opp.profit_potential > dec!(11.1) && opp.profit_potential < dec!(11.2));
    }

    #[test]
    fn test_in_market_needs_volume() {
        let mut market = reach("a", dec!(100000), dec!(0.40));
        market.no_price = dec!(0.50);
        market.volume = dec!(4000); // below the 5000 gate

        let opps = detector().scan_topic(Topic::Btc, &[market]);
        assert!(opps.is_empty());
    }

    #[test]
    fn test_in_market_total_gate() {
        let mut market = reach("a", dec!(100000), dec!(0.48));
        market.no_price = dec!(0.48); // total 0.96 >= 0.95
        market.volume = dec!(10000);

        let opps = detector().scan_topic(Topic::Btc, &[market]);
        assert!(opps.is_empty());
    }

    #[test]
    fn test_in_market_applies_regardless_of_direction() {
        let mut market = threshold_market("a", dec!(100000), Direction::Unknown, dec!(0.40));
        market.no_price = dec!(0.50);
        market.volume = dec!(6000);

        let opps = detector().scan_topic(Topic::Btc, &[market]);
        assert_eq!(violations(&opps, DeltaRule::InMarketArbitrage), 1);
    }

    // ==================== Prepare Tests ====================

    fn normalized(question: &str, volume: Decimal) -> NormalizedMarket {
        NormalizedMarket {
            platform: "polymarket".to_string(),
            market_id: question.to_string(),
            question: question.to_string(),
            outcomes: vec![
                Outcome::new("Yes", dec!(0.4)),
                Outcome::new("No", dec!(0.5)),
            ],
            volume,
            liquidity: Decimal::ZERO,
            end_date: None,
            active: true,
            resolved: false,
            category: Category::Crypto,
            url: None,
        }
    }

    #[test]
    fn test_prepare_groups_by_topic() {
        let markets = vec![
            normalized("Will Bitcoin reach $100K?", dec!(5000)),
            normalized("Will Bitcoin reach $150K?", dec!(5000)),
            normalized("Will Ethereum reach $5,000?", dec!(5000)),
        ];

        let groups = detector().prepare(&markets);
        assert_eq!(groups.get(&Topic::Btc).map(Vec::len), Some(2));
        assert_eq!(groups.get(&Topic::Eth).map(Vec::len), Some(1));
    }

    #[test]
    fn test_prepare_filters_volume_and_thresholds() {
        let markets = vec![
            normalized("Will Bitcoin reach $100K?", dec!(500)), // below volume gate
            normalized("Will Bitcoin go up a lot?", dec!(5000)), // no threshold
        ];

        let groups = detector().prepare(&markets);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_prepare_skips_closed_and_non_binary() {
        let mut resolved = normalized("Will Bitcoin reach $100K?", dec!(5000));
        resolved.resolved = true;

        let mut multi = normalized("Will Bitcoin reach $150K?", dec!(5000));
        multi.outcomes.push(Outcome::new("Maybe", dec!(0.1)));

        let groups = detector().prepare(&[resolved, multi]);
        assert!(groups.is_empty());
    }

    // ==================== Scan Ordering Tests ====================

    #[test]
    fn test_scan_sorts_by_profit_descending() {
        let mut groups: BTreeMap<Topic, Vec<ThresholdMarket>> = BTreeMap::new();
        groups.insert(
            Topic::Btc,
            vec![
                reach("a", dec!(100000), dec!(0.20)),
                reach("b", dec!(150000), dec!(0.30)), // 50% violation
            ],
        );
        groups.insert(
            Topic::Eth,
            vec![
                reach("c", dec!(5000), dec!(0.10)),
                reach("d", dec!(10000), dec!(0.40)), // 300% violation
            ],
        );

        let opps = detector().scan(&groups);
        assert_eq!(opps.len(), 2);
        assert_eq!(opps[0].profit_potential, dec!(300));
        assert_eq!(opps[1].profit_potential, dec!(50));
    }
}
