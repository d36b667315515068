//! Result types for API responses.
//!
//! Every model wraps the decoded JSON it was built from and exposes
//! typed accessors for the fields callers commonly need. The raw mapping
//! stays reachable through `Deref<Target = Entity>`.
//!
//! - `Entity`: the raw JSON object plus accessor helpers
//! - Market data: `Trade`, `Quote`, `Agg` and their tick lists
//! - Reference data: `Exchange`, `Company`, `Ticker`, `Dividends`, etc.

#[macro_use]
mod entity;
pub mod market;
pub mod reference;

pub use entity::Entity;
pub use market::{Agg, Aggs, Quote, Quotes, Trade, Trades};
pub use reference::{
    Analysts, Company, ConditionMap, Dividend, Dividends, Earning, Earnings, Exchange, Financial,
    Financials, News, NewsList, Split, Splits, SymbolTypeMap, Ticker,
};
