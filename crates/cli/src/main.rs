use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "edgescan")]
#[command(about = "Prediction-market inefficiency scanner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan Polymarket for intra-platform arbitrage (YES + NO < $1)
    ScanArb {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Markets to fetch
        #[arg(short, long)]
        limit: Option<usize>,
        /// Minimum net profit percent
        #[arg(long)]
        min_profit: Option<Decimal>,
    },
    /// Scan all platforms for cross-platform arbitrage
    ScanCross {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Markets to fetch per platform
        #[arg(short, long)]
        limit: Option<usize>,
        /// Minimum net profit percent
        #[arg(long)]
        min_profit: Option<Decimal>,
        /// Event-matching similarity threshold (0.0 to 1.0)
        #[arg(long)]
        similarity: Option<f64>,
    },
    /// Scan Polymarket threshold markets for logical mispricing
    ScanDelta {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Markets to fetch
        #[arg(short, long, default_value = "500")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::ScanArb {
            config,
            limit,
            min_profit,
        } => commands::scan_arb::run(&config, limit, min_profit).await,
        Commands::ScanCross {
            config,
            limit,
            min_profit,
            similarity,
        } => commands::scan_cross::run(&config, limit, min_profit, similarity).await,
        Commands::ScanDelta { config, limit } => commands::scan_delta::run(&config, limit).await,
    }
}
