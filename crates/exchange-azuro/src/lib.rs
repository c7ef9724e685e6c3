//! Azuro protocol integration.
//!
//! Azuro is a decentralized sports-betting protocol queried through
//! TheGraph. Conditions quote decimal odds rather than probabilities, so
//! normalization converts via `price = 1 / odds`, and turnover arrives in
//! wei.

pub mod client;
pub mod models;

pub use client::AzuroClient;
pub use models::RawCondition;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Platform identifier used in normalized markets.
pub const PLATFORM: &str = "azuro";

/// Approximate margin built into Azuro odds (5%).
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.05);
