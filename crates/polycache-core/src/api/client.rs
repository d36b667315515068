//! Request dispatch and endpoint methods.
//!
//! `RestClient::request` is the single path every endpoint goes through:
//! derive the cache key, serve a cached response if one exists, otherwise
//! issue the request, store the response and return it.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::cache::{CacheKey, FileCache};
use crate::config::ClientConfig;
use crate::models::{
    Aggs, Analysts, Company, ConditionMap, Dividends, Earnings, Exchange, Financials, NewsList,
    Quote, Quotes, Splits, SymbolTypeMap, Ticker, Trade, Trades,
};

use super::aggregates::v2_to_v1;
use super::pagination::Paginator;
use super::{ApiError, ApiVersion, HttpTransport, Params, Transport};

/// Most symbols accepted by one batch lookup.
pub const MAX_BATCH_SYMBOLS: usize = 50;

/// Ticker listing endpoint (v2), the only paginated one.
const TICKERS_PATH: &str = "/reference/tickers";

/// Build a `Params` map from literal pairs.
fn params<const N: usize>(pairs: [(&str, String); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Insert `key` only when `value` is present.
fn insert_opt<V: ToString>(params: &mut Params, key: &str, value: Option<V>) {
    if let Some(value) = value {
        params.insert(key.to_string(), value.to_string());
    }
}

fn decode<M: DeserializeOwned>(value: Value) -> Result<M, ApiError> {
    Ok(serde_json::from_value(value)?)
}

/// Client for the Polygon REST API.
///
/// Generic over its `Transport` so tests can script responses; production
/// code uses the default `HttpTransport`.
#[derive(Debug, Clone)]
pub struct RestClient<T = HttpTransport> {
    config: ClientConfig,
    cache: FileCache,
    transport: T,
}

impl RestClient<HttpTransport> {
    /// Create a client backed by a blocking reqwest transport
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config.timeout, config.max_retries)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> RestClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ApiError> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::InvalidConfig("API key must not be empty".to_string()));
        }
        let cache = FileCache::new(config.cache_dir.clone(), config.cache_enabled);
        Ok(Self {
            config,
            cache,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Cache key for a request descriptor. The API key and staging flag
    /// are not part of it.
    pub fn cache_key(
        method: &Method,
        path: &str,
        params: &Params,
        version: ApiVersion,
    ) -> CacheKey {
        CacheKey::derive(method.as_str(), path, params, version.as_str())
    }

    /// Full URL for `path` under `version`.
    pub fn url_for(&self, path: &str, version: ApiVersion) -> String {
        format!("{}{}{}", self.config.normalized_base_url(), version, path)
    }

    /// Query sent on the wire: `params` plus credentials and staging flag.
    fn query_for(&self, params: &Params) -> Vec<(String, String)> {
        let mut query = params.clone();
        query.insert("apiKey".to_string(), self.config.api_key.clone());
        if self.config.staging {
            query.insert("staging".to_string(), "true".to_string());
        }
        query.into_iter().collect()
    }

    /// Serve `method path?params` from the cache, or fetch and cache it.
    ///
    /// A cached entry is returned as-is and never refreshed. Cache read and
    /// write failures are logged and otherwise ignored.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        version: ApiVersion,
    ) -> Result<Value, ApiError> {
        let key = Self::cache_key(&method, path, params, version);

        match self.cache.read::<Value>(key.as_str()) {
            Ok(Some(cached)) => {
                debug!(cache_key = %key, path = path, "Cache hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Failed to read cache entry, fetching live");
            }
        }

        let url = self.url_for(path, version);
        debug!(cache_key = %key, url = %url, "Cache miss, sending request");
        let response = self.transport.send(&method, &url, &self.query_for(params))?;

        if let Err(e) = self.cache.write(key.as_str(), &response) {
            warn!(cache_key = %key, error = %e, "Failed to write cache entry");
        }
        Ok(response)
    }

    pub fn get(&self, path: &str, params: &Params, version: ApiVersion) -> Result<Value, ApiError> {
        self.request(Method::GET, path, params, version)
    }

    // ===== Reference metadata =====

    pub fn exchanges(&self) -> Result<Vec<Exchange>, ApiError> {
        decode(self.get("/meta/exchanges", &Params::new(), ApiVersion::V1)?)
    }

    pub fn symbol_type_map(&self) -> Result<SymbolTypeMap, ApiError> {
        decode(self.get("/meta/symbol-types", &Params::new(), ApiVersion::V1)?)
    }

    /// Condition codes for a tick type (`"trades"` or `"quotes"`).
    pub fn condition_map(&self, ticktype: &str) -> Result<ConditionMap, ApiError> {
        let path = format!("/meta/conditions/{}", ticktype);
        decode(self.get(&path, &Params::new(), ApiVersion::V1)?)
    }

    // ===== Historic market data =====

    pub fn historic_trades(
        &self,
        symbol: &str,
        date: &str,
        offset: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Trades, ApiError> {
        let path = format!("/historic/trades/{}/{}", symbol, date);
        let mut params = Params::new();
        insert_opt(&mut params, "offset", offset);
        insert_opt(&mut params, "limit", limit);
        decode(self.get(&path, &params, ApiVersion::V1)?)
    }

    pub fn historic_quotes(
        &self,
        symbol: &str,
        date: &str,
        offset: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Quotes, ApiError> {
        let path = format!("/historic/quotes/{}/{}", symbol, date);
        let mut params = Params::new();
        insert_opt(&mut params, "offset", offset);
        insert_opt(&mut params, "limit", limit);
        decode(self.get(&path, &params, ApiVersion::V1)?)
    }

    /// v1 aggregate bars of `size` (`"day"` or `"minute"`).
    pub fn historic_agg(
        &self,
        size: &str,
        symbol: &str,
        from: Option<&str>,
        to: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Aggs, ApiError> {
        let path = format!("/historic/agg/{}/{}", size, symbol);
        let mut params = Params::new();
        insert_opt(&mut params, "from", from);
        insert_opt(&mut params, "to", to);
        insert_opt(&mut params, "limit", limit);
        decode(self.get(&path, &params, ApiVersion::V1)?)
    }

    /// v2 aggregate bars, converted to the v1 layout.
    pub fn historic_agg_v2(
        &self,
        symbol: &str,
        from: &str,
        to: &str,
        timeframe: &str,
    ) -> Result<Aggs, ApiError> {
        let path = format!("/aggs/ticker/{}/range/1/{}/{}/{}", symbol, timeframe, from, to);
        let raw = self.get(&path, &Params::new(), ApiVersion::V2)?;
        decode(v2_to_v1(raw, timeframe)?)
    }

    // ===== Last trade / quote =====

    fn last_of(&self, path: &str) -> Result<Value, ApiError> {
        let mut raw = self.get(path, &Params::new(), ApiVersion::V1)?;
        raw.get_mut("last")
            .map(Value::take)
            .ok_or_else(|| {
                ApiError::InvalidResponse(format!("missing `last` in response from {}", path))
            })
    }

    pub fn last_trade(&self, symbol: &str) -> Result<Trade, ApiError> {
        decode(self.last_of(&format!("/last/stocks/{}", symbol))?)
    }

    pub fn last_quote(&self, symbol: &str) -> Result<Quote, ApiError> {
        decode(self.last_of(&format!("/last_quote/stocks/{}", symbol))?)
    }

    // ===== Symbol lookups =====

    /// One request for a batch of symbols, fanned out per symbol.
    ///
    /// Symbols missing from the response are left out of the result.
    fn lookup_symbols<M, S>(
        &self,
        symbols: &[S],
        resource: &str,
    ) -> Result<BTreeMap<String, M>, ApiError>
    where
        M: DeserializeOwned,
        S: AsRef<str>,
    {
        if symbols.len() > MAX_BATCH_SYMBOLS {
            return Err(ApiError::TooManySymbols {
                count: symbols.len(),
                max: MAX_BATCH_SYMBOLS,
            });
        }
        if symbols.is_empty() {
            return Ok(BTreeMap::new());
        }

        let joined = symbols.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let path = format!("/meta/symbols/{}", resource);
        let response = self.get(&path, &params([("symbols", joined)]), ApiVersion::V1)?;

        let mut by_symbol: Map<String, Value> = match response {
            Value::Object(map) => map,
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| {
                    let symbol = item.get("symbol")?.as_str()?.to_string();
                    Some((symbol, item))
                })
                .collect(),
            _ => {
                return Err(ApiError::InvalidResponse(format!(
                    "unexpected {} lookup response shape",
                    resource
                )))
            }
        };

        let mut found = BTreeMap::new();
        for symbol in symbols.iter().map(AsRef::as_ref) {
            match by_symbol.remove(symbol) {
                Some(value) => {
                    found.insert(symbol.to_string(), decode(value)?);
                }
                None if found.contains_key(symbol) => {}
                None => {
                    debug!(
                        symbol = symbol,
                        resource = resource,
                        "Symbol missing from lookup response"
                    );
                }
            }
        }
        Ok(found)
    }

    fn lookup_symbol<M: DeserializeOwned>(
        &self,
        symbol: &str,
        resource: &str,
    ) -> Result<Option<M>, ApiError> {
        Ok(self.lookup_symbols([symbol].as_slice(), resource)?.remove(symbol))
    }

    pub fn company(&self, symbol: &str) -> Result<Option<Company>, ApiError> {
        self.lookup_symbol(symbol, "company")
    }

    pub fn company_batch<S: AsRef<str>>(
        &self,
        symbols: &[S],
    ) -> Result<BTreeMap<String, Company>, ApiError> {
        self.lookup_symbols(symbols, "company")
    }

    pub fn dividends(&self, symbol: &str) -> Result<Option<Dividends>, ApiError> {
        self.lookup_symbol(symbol, "dividends")
    }

    pub fn dividends_batch<S: AsRef<str>>(
        &self,
        symbols: &[S],
    ) -> Result<BTreeMap<String, Dividends>, ApiError> {
        self.lookup_symbols(symbols, "dividends")
    }

    pub fn earnings(&self, symbol: &str) -> Result<Option<Earnings>, ApiError> {
        self.lookup_symbol(symbol, "earnings")
    }

    pub fn earnings_batch<S: AsRef<str>>(
        &self,
        symbols: &[S],
    ) -> Result<BTreeMap<String, Earnings>, ApiError> {
        self.lookup_symbols(symbols, "earnings")
    }

    pub fn financials(&self, symbol: &str) -> Result<Option<Financials>, ApiError> {
        self.lookup_symbol(symbol, "financials")
    }

    pub fn financials_batch<S: AsRef<str>>(
        &self,
        symbols: &[S],
    ) -> Result<BTreeMap<String, Financials>, ApiError> {
        self.lookup_symbols(symbols, "financials")
    }

    // ===== Per-symbol metadata =====

    pub fn splits(&self, symbol: &str) -> Result<Splits, ApiError> {
        let path = format!("/meta/symbols/{}/splits", symbol);
        decode(self.get(&path, &Params::new(), ApiVersion::V1)?)
    }

    pub fn analysts(&self, symbol: &str) -> Result<Analysts, ApiError> {
        let path = format!("/meta/symbols/{}/analysts", symbol);
        decode(self.get(&path, &Params::new(), ApiVersion::V1)?)
    }

    pub fn news(&self, symbol: &str) -> Result<NewsList, ApiError> {
        let path = format!("/meta/symbols/{}/news", symbol);
        decode(self.get(&path, &Params::new(), ApiVersion::V1)?)
    }

    // ===== Tickers =====

    /// Every active ticker. US stocks are paged through starting at page 1;
    /// other markets are fetched with a single unpaged request.
    pub fn all_tickers(&self, us_only: bool) -> Result<Vec<Ticker>, ApiError> {
        let mut base = params([("active", "true".to_string())]);
        if us_only {
            base.insert("market".to_string(), "stocks".to_string());
            base.insert("locale".to_string(), "us".to_string());
        }
        let first_page = us_only.then_some(1);

        let tickers = Paginator::new("tickers", self.config.max_pages).collect(first_page, |page| {
            let mut page_params = base.clone();
            insert_opt(&mut page_params, "page", page);
            self.get(TICKERS_PATH, &page_params, ApiVersion::V2)
        })?;

        tickers.into_iter().map(decode::<Ticker>).collect()
    }

    pub fn snapshot(&self, symbol: &str) -> Result<Ticker, ApiError> {
        let path = format!("/snapshot/locale/us/markets/stocks/tickers/{}", symbol);
        decode(self.get(&path, &Params::new(), ApiVersion::V2)?)
    }
}
