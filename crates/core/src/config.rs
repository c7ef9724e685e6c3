//! Scanner configuration.
//!
//! All detection thresholds are supplied here rather than hardcoded in the
//! detectors, so callers (CLI flags, config file, environment) can tune a
//! scan without touching the detection code.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Top-level scan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Minimum net profit (percent) for an opportunity to be emitted.
    pub min_profit_pct: Decimal,

    /// Similarity threshold for cross-platform event matching (0.0 to 1.0).
    pub similarity_threshold: f64,

    /// Minimum traded volume for a market to enter a scan. Defaults to 0
    /// (off) because some platforms do not report volume at all.
    pub min_volume: Decimal,

    /// Maximum days until resolution. When set, markets without an end
    /// date are excluded from the scan.
    pub max_days_to_resolution: Option<i64>,

    /// How many markets to fetch from each platform per scan.
    pub markets_per_platform: usize,

    /// Fee rate applied when a platform is missing from [`Self::fees`].
    pub default_fee_rate: Decimal,

    /// Per-platform trading-fee rates, charged on winnings.
    pub fees: BTreeMap<String, Decimal>,

    /// Delta/logical-mispricing tunables.
    pub delta: DeltaConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let mut fees = BTreeMap::new();
        fees.insert("polymarket".to_string(), dec!(0.02));
        fees.insert("kalshi".to_string(), dec!(0.01));
        fees.insert("azuro".to_string(), dec!(0.05));
        fees.insert("predictit".to_string(), dec!(0.10));

        Self {
            min_profit_pct: dec!(0.5),
            similarity_threshold: 0.5,
            min_volume: Decimal::ZERO,
            max_days_to_resolution: None,
            markets_per_platform: 50,
            default_fee_rate: dec!(0.02),
            fees,
            delta: DeltaConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Trading-fee rate for a platform, falling back to the default rate.
    #[must_use]
    pub fn fee_for(&self, platform: &str) -> Decimal {
        self.fees
            .get(platform)
            .copied()
            .unwrap_or(self.default_fee_rate)
    }

    /// Sets the minimum profit threshold.
    #[must_use]
    pub fn with_min_profit_pct(mut self, pct: Decimal) -> Self {
        self.min_profit_pct = pct;
        self
    }

    /// Sets the event-matching similarity threshold.
    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Sets the minimum-volume filter.
    #[must_use]
    pub fn with_min_volume(mut self, volume: Decimal) -> Self {
        self.min_volume = volume;
        self
    }

    /// Sets the maximum-days-to-resolution filter.
    #[must_use]
    pub fn with_max_days_to_resolution(mut self, days: i64) -> Self {
        self.max_days_to_resolution = Some(days);
        self
    }
}

/// Tunables for the delta/logical-mispricing detector.
///
/// The defaults mirror the production scanner's fixed constants; they are
/// exposed as configuration rather than re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaConfig {
    /// Minimum volume for a market to join a topic group.
    pub min_group_volume: Decimal,

    /// Adjacent thresholds closer than this ratio are skipped as
    /// near-equal in the reach rule.
    pub adjacent_ratio: Decimal,

    /// Maximum YES-price gap for the near-miss advisory.
    pub near_miss_gap: Decimal,

    /// Minimum lower-threshold YES price for the near-miss advisory.
    pub near_miss_floor: Decimal,

    /// YES+NO totals below this trigger the in-market arbitrage rule.
    pub in_market_total: Decimal,

    /// Minimum volume for the in-market arbitrage rule.
    pub in_market_min_volume: Decimal,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            min_group_volume: dec!(1000),
            adjacent_ratio: dec!(1.1),
            near_miss_gap: dec!(0.02),
            near_miss_floor: dec!(0.05),
            in_market_total: dec!(0.95),
            in_market_min_volume: dec!(5000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ScanConfig::default();
        assert_eq!(config.min_profit_pct, dec!(0.5));
        assert!((config.similarity_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.min_volume, Decimal::ZERO);
        assert!(config.max_days_to_resolution.is_none());
    }

    #[test]
    fn test_fee_for_known_platform() {
        let config = ScanConfig::default();
        assert_eq!(config.fee_for("polymarket"), dec!(0.02));
        assert_eq!(config.fee_for("kalshi"), dec!(0.01));
        assert_eq!(config.fee_for("predictit"), dec!(0.10));
    }

    #[test]
    fn test_fee_for_unknown_platform_uses_default() {
        let config = ScanConfig::default();
        assert_eq!(config.fee_for("somewhere-new"), dec!(0.02));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ScanConfig::default()
            .with_min_profit_pct(dec!(1.5))
            .with_similarity_threshold(0.45)
            .with_min_volume(dec!(500))
            .with_max_days_to_resolution(30);

        assert_eq!(config.min_profit_pct, dec!(1.5));
        assert!((config.similarity_threshold - 0.45).abs() < f64::EPSILON);
        assert_eq!(config.min_volume, dec!(500));
        assert_eq!(config.max_days_to_resolution, Some(30));
    }

    #[test]
    fn test_delta_defaults_match_production_constants() {
        let delta = DeltaConfig::default();
        assert_eq!(delta.adjacent_ratio, dec!(1.1));
        assert_eq!(delta.near_miss_gap, dec!(0.02));
        assert_eq!(delta.near_miss_floor, dec!(0.05));
        assert_eq!(delta.in_market_total, dec!(0.95));
        assert_eq!(delta.in_market_min_volume, dec!(5000));
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: ScanConfig = serde_json::from_str(r#"{"min_profit_pct": "2.0"}"#).unwrap();
        assert_eq!(config.min_profit_pct, dec!(2.0));
        assert_eq!(config.markets_per_platform, 50);
        assert_eq!(config.delta.in_market_total, dec!(0.95));
    }
}
