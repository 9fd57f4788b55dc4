use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod extractor;
mod fetcher;
mod models;
mod price;
mod price_finder;
mod sites;
mod traits;

use config::FinderConfig;
use price_finder::PriceFinder;
use traits::FetchMethod;

#[derive(Debug, Parser)]
#[command(name = "medicine-price-finder")]
#[command(about = "Compare medicine prices across online pharmacies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare prices for one medicine
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = FetchMethod::Static)]
        method: FetchMethod,
    },
    /// Compare prices for several medicines, one after another
    Batch {
        #[arg(required = true)]
        queries: Vec<String>,
        #[arg(long, value_enum, default_value_t = FetchMethod::Static)]
        method: FetchMethod,
    },
    /// List the configured pharmacy sites
    Sites,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = FinderConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search { query, method } => {
            let finder = PriceFinder::new(config)?;
            let report = finder.compare(&query, method).await;
            print_json(&report)?;
        }
        Commands::Batch { queries, method } => {
            info!("Starting batch of {} queries", queries.len());
            let finder = PriceFinder::new(config)?;
            let batch = finder.compare_batch(&queries, method).await?;
            print_json(&batch)?;
        }
        Commands::Sites => print_json(&sites::registry())?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
