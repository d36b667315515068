//! Command-line parsing for polycache.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Query market data through the caching Polygon client
#[derive(Parser, Debug)]
#[command(name = "polycache")]
#[command(about = "Cached Polygon market-data lookups")]
#[command(version)]
pub struct Cli {
    /// API key; falls back to the POLYGON_API_KEY environment variable
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Send requests to the staging environment
    #[arg(long, global = true)]
    pub staging: bool,

    /// Always request live data and do not write the cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Directory holding cached responses
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List exchanges
    Exchanges,
    /// Most recent trade for a symbol
    LastTrade { symbol: String },
    /// Most recent quote for a symbol
    LastQuote { symbol: String },
    /// Company details for up to 50 symbols
    Company {
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,
    },
    /// Analyst ratings for a symbol
    Analysts { symbol: String },
    /// Aggregate bars between two dates
    Aggs {
        symbol: String,
        from: String,
        to: String,
        /// Bar size: day or minute
        #[arg(long, default_value = "day")]
        timeframe: String,
    },
    /// Every active ticker
    Tickers {
        /// Include all markets instead of US stocks only
        #[arg(long)]
        all_markets: bool,
    },
    /// Current snapshot for a symbol
    Snapshot { symbol: String },
    /// Persist --staging, --no-cache and --cache-dir as defaults
    SaveSettings,
}
