//! polycache - command-line front end for the caching Polygon client.
//!
//! Reads the API key from `--api-key` or `POLYGON_API_KEY` (a `.env` file
//! is honoured), runs one lookup and prints the result as JSON.

mod cli;
mod config;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use polycache_core::RestClient;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};
use config::Settings;

/// Environment variable holding the API key
const API_KEY_VAR: &str = "POLYGON_API_KEY";

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Fold command-line overrides into the stored settings
fn apply_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if cli.staging {
        settings.staging = Some(true);
    }
    if cli.no_cache {
        settings.cache_enabled = Some(false);
    }
    if let Some(ref dir) = cli.cache_dir {
        settings.cache_dir = Some(dir.clone());
    }
    settings
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings_path = Settings::config_path()?;
    let stored = Settings::load_from(&settings_path).context("Failed to load settings")?;
    let settings = apply_overrides(stored, &cli);

    if cli.command == Command::SaveSettings {
        settings
            .save_to(&settings_path)
            .context("Failed to save settings")?;
        eprintln!("Settings saved to {}", settings_path.display());
        return Ok(());
    }

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var(API_KEY_VAR).ok())
        .ok_or_else(|| anyhow::anyhow!("No API key: pass --api-key or set {}", API_KEY_VAR))?;

    let config = settings.client_config(api_key)?;
    debug!(
        cache_dir = %config.cache_dir.display(),
        cache_enabled = config.cache_enabled,
        "Starting"
    );
    let client = RestClient::new(config).context("Failed to create API client")?;

    match cli.command {
        Command::Exchanges => print_json(&client.exchanges()?),
        Command::LastTrade { symbol } => print_json(&client.last_trade(&symbol)?),
        Command::LastQuote { symbol } => print_json(&client.last_quote(&symbol)?),
        Command::Company { symbols } => match symbols.as_slice() {
            [symbol] => print_json(&client.company(symbol)?),
            _ => print_json(&client.company_batch(&symbols)?),
        },
        Command::Analysts { symbol } => print_json(&client.analysts(&symbol)?),
        Command::Aggs {
            symbol,
            from,
            to,
            timeframe,
        } => print_json(&client.historic_agg_v2(&symbol, &from, &to, &timeframe)?),
        Command::Tickers { all_markets } => {
            let tickers = client
                .all_tickers(!all_markets)
                .context("Failed to list tickers")?;
            debug!(count = tickers.len(), "Fetched tickers");
            print_json(&tickers)
        }
        Command::Snapshot { symbol } => print_json(&client.snapshot(&symbol)?),
        Command::SaveSettings => Ok(()),
    }
}
