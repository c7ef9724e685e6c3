use edgescan_detect::Scanner;
use edgescan_polymarket::GammaClient;
use rust_decimal::prelude::ToPrimitive;

use super::{clip, fetch_platform, load_config};

pub async fn run(config_path: &str, limit: usize) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let client = GammaClient::new();
    let markets = fetch_platform(&client, limit).await;

    let scanner = Scanner::new(config);
    let opportunities = scanner.scan_delta(&markets);

    if opportunities.is_empty() {
        println!(
            "No logical mispricing found across {} markets. Threshold chains look consistent.",
            markets.len()
        );
        return Ok(());
    }

    for (i, opp) in opportunities.iter().enumerate() {
        println!(
            "{}. [{}] {} (confidence {}, est. profit {:.1}%)",
            i + 1,
            opp.topic,
            opp.logic_error,
            opp.confidence,
            opp.profit_potential.to_f64().unwrap_or_default(),
        );
        println!("   {}", clip(&opp.event_b.question, 70));
        println!("   Action: {}", opp.action);
        if let Some(url) = &opp.event_b.url {
            println!("   {url}");
        }
        println!();
    }
    println!("{} opportunities.", opportunities.len());

    Ok(())
}
