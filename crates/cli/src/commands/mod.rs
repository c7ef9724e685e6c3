pub mod scan_arb;
pub mod scan_cross;
pub mod scan_delta;

use edgescan_core::{ConfigLoader, NormalizedMarket, PlatformAdapter, ScanConfig};
use tracing::{info, warn};

/// Loads configuration from the given path.
pub fn load_config(path: &str) -> anyhow::Result<ScanConfig> {
    ConfigLoader::load_from(path)
}

/// Fetches a platform snapshot, degrading a failure to an empty list so
/// the remaining platforms still scan.
pub async fn fetch_platform(
    adapter: &dyn PlatformAdapter,
    limit: usize,
) -> Vec<NormalizedMarket> {
    match adapter.fetch_markets(limit).await {
        Ok(markets) => {
            info!(
                platform = adapter.platform_id(),
                count = markets.len(),
                "platform snapshot fetched"
            );
            markets
        }
        Err(error) => {
            warn!(
                platform = adapter.platform_id(),
                %error,
                "platform fetch failed, scanning without it"
            );
            Vec::new()
        }
    }
}

/// Truncates on a character boundary, appending an ellipsis when cut.
pub fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
