//! Kalshi integration.
//!
//! Reads public market data from the Kalshi trade API. Kalshi quotes prices
//! in cents; normalization scales them to probabilities and synthesizes the
//! No side as `1 - yes` since the API only quotes the Yes book.

pub mod client;
pub mod error;
pub mod models;

pub use client::KalshiClient;
pub use error::{KalshiError, Result};
pub use models::RawKalshiMarket;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Platform identifier used in normalized markets.
pub const PLATFORM: &str = "kalshi";

/// Approximate trading fee on winnings (1%, varies by contract).
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.01);
