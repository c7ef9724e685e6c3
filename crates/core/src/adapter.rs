//! The seam between the scan pipeline and platform I/O.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::market::NormalizedMarket;

/// A prediction-market platform the scanner can fetch snapshots from.
///
/// Implementations own their HTTP client and normalization; the pipeline
/// only ever sees already-normalized markets. A failing fetch surfaces as
/// an error here and becomes "zero markets from this platform" upstream —
/// the detectors tolerate partial platform coverage.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Stable platform identifier ("polymarket", "kalshi", ...).
    fn platform_id(&self) -> &'static str;

    /// Default trading-fee rate charged on winnings, as a decimal
    /// (0.02 = 2%).
    fn fee_rate(&self) -> Decimal;

    /// Fetches up to `limit` active markets, normalized.
    ///
    /// # Errors
    ///
    /// Returns an error on network or protocol failure. Malformed
    /// individual records are skipped during normalization and never
    /// cause an error.
    async fn fetch_markets(&self, limit: usize) -> anyhow::Result<Vec<NormalizedMarket>>;
}
