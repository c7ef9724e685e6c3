//! PredictIt integration.
//!
//! PredictIt groups contracts under markets: a single-contract market is a
//! plain binary question, while a multi-contract market ("Who will win X?")
//! normalizes to one multi-outcome market with a price per contract.

pub mod client;
pub mod models;

pub use client::PredictItClient;
pub use models::RawPredictItMarket;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Platform identifier used in normalized markets.
pub const PLATFORM: &str = "predictit";

/// Fee on profits (10%); withdrawal fees are not modeled.
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.10);
