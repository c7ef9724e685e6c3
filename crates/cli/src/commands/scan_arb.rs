use edgescan_detect::Scanner;
use edgescan_polymarket::GammaClient;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::{clip, fetch_platform, load_config};

pub async fn run(
    config_path: &str,
    limit: Option<usize>,
    min_profit: Option<Decimal>,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(pct) = min_profit {
        config.min_profit_pct = pct;
    }
    let limit = limit.unwrap_or(config.markets_per_platform);

    let client = GammaClient::new();
    let markets = fetch_platform(&client, limit).await;

    let scanner = Scanner::new(config);
    let opportunities = scanner.scan_intra(&markets);

    if opportunities.is_empty() {
        println!("No intra-platform arbitrage found in {} markets.", markets.len());
        return Ok(());
    }

    println!(
        "{:<44} {:>6} {:>10} {:>8} {:>8} {:>12}",
        "Market", "Type", "Total cost", "Gross %", "Net %", "$100 profit"
    );
    for opp in &opportunities {
        let returns = opp.returns_for(Decimal::ONE_HUNDRED);
        println!(
            "{:<44} {:>6} {:>10.4} {:>7.2}% {:>7.2}% {:>11.2}",
            clip(&opp.market.question, 44),
            match opp.kind {
                edgescan_detect::MarketKind::Binary => "binary",
                edgescan_detect::MarketKind::MultiOutcome => "multi",
            },
            opp.total_cost.to_f64().unwrap_or_default(),
            opp.gross_profit_pct.to_f64().unwrap_or_default(),
            opp.net_profit_pct.to_f64().unwrap_or_default(),
            returns.net_profit.to_f64().unwrap_or_default(),
        );
    }
    println!(
        "\n{} opportunities. Stake splits follow each record's optimal allocation.",
        opportunities.len()
    );

    Ok(())
}
