use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::config::ScanConfig;

/// Loads [`ScanConfig`] from disk and environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by layering `config/Config.toml` and
    /// `EDGESCAN_`-prefixed environment variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source cannot be read or parsed.
    pub fn load() -> Result<ScanConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads configuration from a specific TOML file path.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<ScanConfig> {
        let config: ScanConfig = Figment::from(Serialized::defaults(ScanConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("EDGESCAN_"))
            .extract()?;

        tracing::debug!(path, "loaded scan configuration");
        Ok(config)
    }
}
