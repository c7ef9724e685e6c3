//! The scan pipeline.
//!
//! Composes the matcher and the three detectors over a fully-materialized
//! snapshot of normalized markets. Detection is pure and synchronous; the
//! pipeline holds no state between scans beyond the injectable cache of
//! the most recent report.

use chrono::Utc;
use edgescan_core::{NormalizedMarket, ResultCache, ScanConfig};
use tracing::info;

use crate::cross::CrossPlatformDetector;
use crate::delta::DeltaDetector;
use crate::intra::IntraPlatformDetector;
use crate::matcher::{EventMatcher, MatchConfig};
use crate::types::{
    CrossPlatformOpportunity, DeltaOpportunity, IntraPlatformOpportunity, MatchedEvent, ScanReport,
};

/// Runs every scanner over one market snapshot.
pub struct Scanner {
    config: ScanConfig,
    matcher: EventMatcher,
    intra: IntraPlatformDetector,
    cross: CrossPlatformDetector,
    delta: DeltaDetector,
    cache: ResultCache<ScanReport>,
}

impl Scanner {
    /// Creates a scanner with a fresh cache.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self::with_cache(config, ResultCache::new())
    }

    /// Creates a scanner around an externally-owned cache, so callers can
    /// keep a read handle on the latest report.
    #[must_use]
    pub fn with_cache(config: ScanConfig, cache: ResultCache<ScanReport>) -> Self {
        let matcher = EventMatcher::with_config(
            MatchConfig::default().with_similarity_threshold(config.similarity_threshold),
        );
        Self {
            matcher,
            intra: IntraPlatformDetector::new(config.clone()),
            cross: CrossPlatformDetector::new(config.clone()),
            delta: DeltaDetector::new(config.delta.clone()),
            cache,
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Read handle on the most recent report.
    #[must_use]
    pub fn cache(&self) -> &ResultCache<ScanReport> {
        &self.cache
    }

    /// Applies the snapshot-wide pre-filters: open markets only, the
    /// minimum-volume gate, and (when configured) the resolution-window
    /// gate. Markets without an end date are excluded only when the
    /// window gate is on.
    fn filter_snapshot(&self, markets: &[NormalizedMarket]) -> Vec<NormalizedMarket> {
        let now = Utc::now();
        markets
            .iter()
            .filter(|m| m.is_open())
            .filter(|m| m.volume >= self.config.min_volume)
            .filter(|m| match self.config.max_days_to_resolution {
                None => true,
                Some(max_days) => m
                    .days_to_resolution(now)
                    .is_some_and(|days| (0..=max_days).contains(&days)),
            })
            .cloned()
            .collect()
    }

    /// Scans every market for intra-platform arbitrage, best first.
    #[must_use]
    pub fn scan_intra(&self, markets: &[NormalizedMarket]) -> Vec<IntraPlatformOpportunity> {
        let snapshot = self.filter_snapshot(markets);
        let mut opportunities: Vec<IntraPlatformOpportunity> = snapshot
            .iter()
            .filter_map(|m| self.intra.evaluate(m))
            .collect();

        opportunities.sort_by(|a, b| b.net_profit_pct.cmp(&a.net_profit_pct));
        info!(
            scanned = snapshot.len(),
            found = opportunities.len(),
            "intra-platform scan complete"
        );
        opportunities
    }

    /// Matches cross-platform events in the snapshot.
    #[must_use]
    pub fn match_events(&self, markets: &[NormalizedMarket]) -> Vec<MatchedEvent> {
        let snapshot = self.filter_snapshot(markets);
        self.matcher.match_markets(&snapshot)
    }

    /// Scans matched events for cross-platform arbitrage, best first.
    #[must_use]
    pub fn scan_cross(&self, markets: &[NormalizedMarket]) -> Vec<CrossPlatformOpportunity> {
        let events = self.match_events(markets);
        let mut opportunities = self.evaluate_events(&events);
        opportunities.sort_by(|a, b| b.net_profit_pct.cmp(&a.net_profit_pct));
        opportunities
    }

    /// Scans topic groups for logical mispricing, best first.
    #[must_use]
    pub fn scan_delta(&self, markets: &[NormalizedMarket]) -> Vec<DeltaOpportunity> {
        let snapshot = self.filter_snapshot(markets);
        let groups = self.delta.prepare(&snapshot);
        self.delta.scan(&groups)
    }

    /// Runs all three scanners over one snapshot and caches the report.
    #[must_use]
    pub fn scan_all(&self, markets: &[NormalizedMarket]) -> ScanReport {
        let snapshot = self.filter_snapshot(markets);

        let mut intra: Vec<IntraPlatformOpportunity> = snapshot
            .iter()
            .filter_map(|m| self.intra.evaluate(m))
            .collect();
        intra.sort_by(|a, b| b.net_profit_pct.cmp(&a.net_profit_pct));

        let events = self.matcher.match_markets(&snapshot);
        let mut cross = self.evaluate_events(&events);
        cross.sort_by(|a, b| b.net_profit_pct.cmp(&a.net_profit_pct));

        let groups = self.delta.prepare(&snapshot);
        let delta = self.delta.scan(&groups);

        let report = ScanReport {
            intra,
            events,
            cross,
            delta,
        };

        info!(
            markets = snapshot.len(),
            intra = report.intra.len(),
            cross = report.cross.len(),
            delta = report.delta.len(),
            "full scan complete"
        );

        self.cache.store(report.clone());
        report
    }

    fn evaluate_events(&self, events: &[MatchedEvent]) -> Vec<CrossPlatformOpportunity> {
        events
            .iter()
            .filter_map(|e| self.cross.evaluate(e))
            .collect()
    }
}
