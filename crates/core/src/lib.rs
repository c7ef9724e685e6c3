//! Core types shared by every edgescan crate.
//!
//! This crate defines the platform-agnostic market model that the exchange
//! adapters normalize into, the configuration surface consumed by the
//! detectors, the adapter trait the scan pipeline fetches through, and the
//! injectable cache that holds the most recent scan result.
//!
//! Nothing here performs I/O or detection; those live in the `exchange-*`
//! crates and `edgescan-detect` respectively.

pub mod adapter;
pub mod cache;
pub mod category;
pub mod config;
pub mod config_loader;
pub mod market;

pub use adapter::PlatformAdapter;
pub use cache::ResultCache;
pub use category::Category;
pub use config::{DeltaConfig, ScanConfig};
pub use config_loader::ConfigLoader;
pub use market::{NormalizedMarket, Outcome};
