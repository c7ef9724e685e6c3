use edgescan_azuro::AzuroClient;
use edgescan_core::NormalizedMarket;
use edgescan_detect::Scanner;
use edgescan_kalshi::KalshiClient;
use edgescan_polymarket::GammaClient;
use edgescan_predictit::PredictItClient;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{clip, fetch_platform, load_config};

pub async fn run(
    config_path: &str,
    limit: Option<usize>,
    min_profit: Option<Decimal>,
    similarity: Option<f64>,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(pct) = min_profit {
        config.min_profit_pct = pct;
    }
    if let Some(threshold) = similarity {
        config.similarity_threshold = threshold;
    }
    let limit = limit.unwrap_or(config.markets_per_platform);

    let polymarket = GammaClient::new();
    let kalshi = KalshiClient::new();
    let predictit = PredictItClient::new();
    let azuro = AzuroClient::new("polygon");

    // Fetch all platforms concurrently; a failing platform just drops out
    // of this scan.
    let (poly_markets, kalshi_markets, predictit_markets, azuro_markets) = tokio::join!(
        fetch_platform(&polymarket, limit),
        fetch_platform(&kalshi, limit),
        fetch_platform(&predictit, limit),
        fetch_platform(&azuro, limit),
    );

    let mut markets: Vec<NormalizedMarket> = Vec::new();
    markets.extend(poly_markets);
    markets.extend(kalshi_markets);
    markets.extend(predictit_markets);
    markets.extend(azuro_markets);

    if markets.len() < 2 {
        println!("Not enough markets fetched to look for cross-platform arbitrage.");
        return Ok(());
    }

    let scanner = Scanner::new(config);
    let events = scanner.match_events(&markets);
    let opportunities = scanner.scan_cross(&markets);

    println!(
        "Matched {} cross-platform events across {} markets.\n",
        events.len(),
        markets.len()
    );

    if opportunities.is_empty() {
        println!("No cross-platform arbitrage: combined YES + NO quotes are at or above $1.");
        return Ok(());
    }

    println!(
        "{:<34} {:<16} {:<16} {:>10} {:>8} {:>8}",
        "Event", "Buy YES @", "Buy NO @", "Total", "Gross %", "Net %"
    );
    for opp in opportunities.iter().take(10) {
        println!(
            "{:<34} {:<16} {:<16} {:>10.4} {:>7.2}% {:>7.2}%",
            clip(&opp.event.name, 34),
            format!("{} {:.3}", opp.yes_platform, opp.yes_price.to_f64().unwrap_or_default()),
            format!("{} {:.3}", opp.no_platform, opp.no_price.to_f64().unwrap_or_default()),
            opp.total_cost.to_f64().unwrap_or_default(),
            opp.gross_profit_pct.to_f64().unwrap_or_default(),
            opp.net_profit_pct.to_f64().unwrap_or_default(),
        );
    }
    println!("\nBuy YES on one platform and NO on another; below $1 total the payout is locked in.");

    Ok(())
}
