mod common;

use common::{cached_config, client, uncached_config, NoNetwork, ScriptedTransport};
use serde_json::{json, Value};
use tempfile::TempDir;

fn page(page: u64, per_page: u64, count: u64, symbols: &[&str]) -> Value {
    let tickers: Vec<Value> = symbols
        .iter()
        .map(|s| json!({"ticker": s, "market": "STOCKS", "locale": "US", "active": true}))
        .collect();
    json!({"page": page, "perPage": per_page, "count": count, "status": "OK", "tickers": tickers})
}

fn symbols_of(tickers: &[polycache_core::models::Ticker]) -> Vec<&str> {
    tickers.iter().filter_map(|t| t.symbol()).collect()
}

#[test]
fn test_all_pages_are_concatenated_in_order() {
    let live = ScriptedTransport::new(vec![
        page(1, 2, 5, &["A", "AA"]),
        page(2, 2, 5, &["AAPL", "AMZN"]),
        page(3, 2, 5, &["MSFT"]),
    ]);

    let tickers = client(uncached_config(), &live).all_tickers(true).unwrap();

    assert_eq!(symbols_of(&tickers), vec!["A", "AA", "AAPL", "AMZN", "MSFT"]);
    let calls = live.calls();
    assert_eq!(calls.len(), 3);
    for (i, call) in calls.iter().enumerate() {
        assert_eq!(call.url, "https://api.polygon.io/v2/reference/tickers");
        assert_eq!(call.param("page"), Some((i + 1).to_string().as_str()));
        assert_eq!(call.param("active"), Some("true"));
        assert_eq!(call.param("market"), Some("stocks"));
        assert_eq!(call.param("locale"), Some("us"));
    }
}

#[test]
fn test_first_page_that_is_last_issues_one_request() {
    let live = ScriptedTransport::new(vec![page(1, 50, 2, &["A", "B"])]);

    let tickers = client(uncached_config(), &live).all_tickers(true).unwrap();

    assert_eq!(tickers.len(), 2);
    assert_eq!(live.call_count(), 1);
}

#[test]
fn test_pathological_count_is_bounded_by_page_cap() {
    let responses = (0..4).map(|_| page(1, 1, 1_000_000, &["LOOP"])).collect();
    let live = ScriptedTransport::new(responses);

    let tickers = client(uncached_config().with_max_pages(4), &live)
        .all_tickers(true)
        .unwrap();

    assert_eq!(live.call_count(), 4);
    assert_eq!(tickers.len(), 4);
}

#[test]
fn test_missing_pagination_fields_stop_with_accumulated_tickers() {
    let live = ScriptedTransport::new(vec![
        page(1, 1, 10, &["A"]),
        json!({"status": "OK", "tickers": [{"ticker": "B"}]}),
    ]);

    let tickers = client(uncached_config(), &live).all_tickers(true).unwrap();

    assert_eq!(symbols_of(&tickers), vec!["A", "B"]);
    assert_eq!(live.call_count(), 2);
}

#[test]
fn test_all_markets_is_a_single_unpaged_request() {
    let live = ScriptedTransport::new(vec![page(1, 2, 100, &["BTC", "EURUSD"])]);

    let tickers = client(uncached_config(), &live).all_tickers(false).unwrap();

    assert_eq!(tickers.len(), 2);
    let calls = live.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].param("page"), None);
    assert_eq!(calls[0].param("market"), None);
    assert_eq!(calls[0].param("active"), Some("true"));
}

#[test]
fn test_pages_are_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let live = ScriptedTransport::new(vec![page(1, 1, 2, &["A"]), page(2, 1, 2, &["B"])]);
    let first = client(cached_config(&dir), &live).all_tickers(true).unwrap();

    let second = client(cached_config(&dir), NoNetwork).all_tickers(true).unwrap();
    assert_eq!(first, second);
}
