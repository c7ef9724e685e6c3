//! Polymarket integration.
//!
//! Fetches markets from the public Gamma API and normalizes them into
//! [`edgescan_core::NormalizedMarket`]. Gamma encodes outcome names and
//! prices as JSON strings *inside* the JSON payload; decoding handles both
//! the encoded and plain-array forms.

pub mod client;
pub mod models;

pub use client::GammaClient;
pub use models::RawGammaMarket;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Platform identifier used in normalized markets.
pub const PLATFORM: &str = "polymarket";

/// Trading fee charged on winnings (2%).
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.02);
