//! Pricing-inefficiency detection for prediction markets.
//!
//! This crate is the core of the scanner: it matches semantically
//! identical events across platforms and applies three detectors to a
//! normalized market snapshot.
//!
//! # Overview
//!
//! Three classes of inefficiency are detected:
//!
//! ```text
//! Intra-platform:  YES @ $0.40 + NO @ $0.55 = $0.95 on one market
//!                  -> buy both, $1 payout, 5.26% gross edge
//!
//! Cross-platform:  platform A YES @ $0.50, platform B NO @ $0.47
//!                  -> $0.97 for a $1 payout across venues
//!
//! Delta:           "BTC reaches $150K" YES priced ABOVE
//!                  "BTC reaches $100K" YES
//!                  -> logically impossible ordering, buy the underpriced leg
//! ```
//!
//! # Modules
//!
//! - [`keywords`]: keyword/topic/threshold/direction extraction
//! - [`matcher`]: greedy cross-platform event matching
//! - [`intra`]: single-market arbitrage detection
//! - [`cross`]: cross-platform arbitrage detection
//! - [`delta`]: logical-mispricing detection over topic groups
//! - [`scanner`]: the pipeline composing all of the above
//! - [`types`]: emitted opportunity records
//!
//! # Example
//!
//! ```ignore
//! use edgescan_core::ScanConfig;
//! use edgescan_detect::Scanner;
//!
//! let scanner = Scanner::new(ScanConfig::default());
//! let report = scanner.scan_all(&markets);
//! for opp in &report.cross {
//!     println!(
//!         "buy YES on {} at {}, NO on {} at {} -> {}% net",
//!         opp.yes_platform, opp.yes_price, opp.no_platform, opp.no_price,
//!         opp.net_profit_pct,
//!     );
//! }
//! ```
//!
//! Detection is pure and stateless: the same snapshot always yields the
//! same report, and nothing is persisted between scans.

pub mod cross;
pub mod delta;
pub mod intra;
pub mod keywords;
pub mod matcher;
pub mod scanner;
pub mod types;

pub use cross::CrossPlatformDetector;
pub use delta::DeltaDetector;
pub use intra::IntraPlatformDetector;
pub use keywords::{extract_keywords, Direction, ThresholdExtractor, Topic};
pub use matcher::{EventMatcher, MatchConfig};
pub use scanner::Scanner;
pub use types::{
    CrossPlatformOpportunity, DeltaOpportunity, DeltaRule, IntraPlatformOpportunity, MarketKind,
    MatchedEvent, ScanReport, ThresholdMarket,
};
