//! Vanilla Greeks CLI
//!
//! Prices a book of option contracts and prints the results as JSON.
//!
//! Usage:
//!   vanilla-greeks price [--input book.json] [--config engine.json]
//!   vanilla-greeks term-structure --input book.json
//!   vanilla-greeks risk-grid --input book.json --index 1
//!
//! Without `--input` the built-in sample book (an at-the-money call and put
//! on a 280 strike) is used.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vanilla_greeks::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON array of contracts (type, strike, spot, evalDate, expDate, riskFreeRate, divYield, price, sigma)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// JSON engine configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price and Greeks of every contract at full tenor, plus book totals
    Price,
    /// Daily Greek/PnL term structure of every contract
    TermStructure,
    /// Spot x day risk grid for one contract
    RiskGrid {
        /// Position of the contract in the book
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

#[derive(Debug, Serialize)]
struct BookReport {
    options: Vec<PricedOption>,
    total: Greeks,
}

fn sample_book() -> Result<Vec<OptionContract>> {
    let call = OptionContract::new(OptionType::Call, "20200517", "20201217", 280.0, 280.0, 39.847556)?.with_rate(0.05);
    let put = OptionContract::new(OptionType::Put, "20200517", "20201217", 280.0, 280.0, 26.191795)?.with_rate(0.05);
    Ok(vec![call, put])
}

fn load_book(path: &Path) -> Result<Vec<OptionContract>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let book: Vec<OptionContract> =
        serde_json::from_str(&raw).with_context(|| format!("parsing contracts in {}", path.display()))?;
    Ok(book)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = GreeksEngine::new(config);

    let book = match &args.input {
        Some(path) => load_book(path)?,
        None => {
            info!("No input given, using the sample book");
            sample_book()?
        }
    };
    info!("Loaded {} contracts", book.len());

    match args.command {
        Command::Price => {
            let options = book
                .iter()
                .enumerate()
                .map(|(i, c)| engine.compute_at_expiry(c).with_context(|| format!("pricing contract {}", i)))
                .collect::<Result<Vec<_>>>()?;
            let total = options.iter().fold(Greeks::default(), |acc, o| acc.add(&o.greeks));
            info!(
                "Book delta {:.4} gamma {:.6} theta {:.4} vega {:.4}",
                total.delta, total.gamma, total.theta, total.vega
            );
            print_json(&BookReport { options, total })
        }
        Command::TermStructure => {
            let structures = book
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    engine
                        .compute_term_structure(c)
                        .with_context(|| format!("term structure for contract {}", i))
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&structures)
        }
        Command::RiskGrid { index } => {
            let Some(contract) = book.get(index) else {
                bail!("contract index {} out of range (book has {})", index, book.len());
            };
            let grid = engine
                .configured_risk_grid(contract)
                .with_context(|| format!("risk grid for contract {}", index))?;
            info!("Risk grid has {} points", grid.len());
            print_json(&grid)
        }
    }
}
