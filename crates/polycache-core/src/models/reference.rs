//! Reference data: exchanges, symbol metadata, corporate actions, tickers.

use chrono::{DateTime, Utc};
use serde_json::Value;

entity_model!(Exchange);

impl Exchange {
    pub fn id(&self) -> Option<i64> {
        self.i64("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.str("name")
    }

    pub fn market(&self) -> Option<&str> {
        self.str("market")
    }

    pub fn mic(&self) -> Option<&str> {
        self.str("mic")
    }
}

entity_model!(
    /// Symbol type code to description, e.g. `"cs"` to `"Common Stock"`.
    SymbolTypeMap
);

impl SymbolTypeMap {
    pub fn describe(&self, code: &str) -> Option<&str> {
        self.str(code)
    }
}

entity_model!(
    /// Condition code to condition name for one tick type.
    ConditionMap
);

impl ConditionMap {
    pub fn name_of(&self, code: i64) -> Option<&str> {
        self.str(&code.to_string())
    }
}

entity_model!(Company);

impl Company {
    pub fn symbol(&self) -> Option<&str> {
        self.str("symbol")
    }

    pub fn name(&self) -> Option<&str> {
        self.str("name")
    }

    pub fn exchange(&self) -> Option<&str> {
        self.str("exchange")
    }

    pub fn sector(&self) -> Option<&str> {
        self.str("sector")
    }

    pub fn market_cap(&self) -> Option<f64> {
        self.f64("marketcap")
    }
}

entity_model!(Dividend);

impl Dividend {
    pub fn amount(&self) -> Option<f64> {
        self.f64("amount")
    }

    pub fn ex_date(&self) -> Option<&str> {
        self.str("exDate")
    }

    pub fn payment_date(&self) -> Option<&str> {
        self.str("paymentDate")
    }
}

list_model!(Dividends, Dividend);

entity_model!(Split);

impl Split {
    pub fn ratio(&self) -> Option<f64> {
        self.f64("ratio")
    }

    pub fn ex_date(&self) -> Option<&str> {
        self.str("exDate")
    }
}

list_model!(Splits, Split);

entity_model!(Earning);

impl Earning {
    pub fn fiscal_period(&self) -> Option<&str> {
        self.str("fiscalPeriod")
    }

    pub fn actual_eps(&self) -> Option<f64> {
        self.f64("actualEPS")
    }
}

list_model!(Earnings, Earning);

entity_model!(Financial);

impl Financial {
    pub fn report_period(&self) -> Option<&str> {
        self.str("reportPeriod")
    }

    pub fn revenues(&self) -> Option<f64> {
        self.f64("revenues")
    }
}

list_model!(Financials, Financial);

entity_model!(
    /// Analyst ratings summary for one symbol.
    Analysts
);

impl Analysts {
    pub fn symbol(&self) -> Option<&str> {
        self.str("symbol")
    }

    pub fn analyst_count(&self) -> Option<i64> {
        self.i64("analysts")
    }
}

entity_model!(News);

impl News {
    pub fn title(&self) -> Option<&str> {
        self.str("title")
    }

    pub fn url(&self) -> Option<&str> {
        self.str("url")
    }

    pub fn source(&self) -> Option<&str> {
        self.str("source")
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.str("timestamp")
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }
}

list_model!(NewsList, News);

entity_model!(
    /// A ticker listing entry or a symbol snapshot.
    Ticker
);

impl Ticker {
    /// Ticker symbol. Snapshots nest it one level down.
    pub fn symbol(&self) -> Option<&str> {
        match self.get("ticker") {
            Some(Value::String(symbol)) => Some(symbol.as_str()),
            Some(Value::Object(inner)) => inner.get("ticker").and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.str("name")
    }

    pub fn market(&self) -> Option<&str> {
        self.str("market")
    }

    pub fn locale(&self) -> Option<&str> {
        self.str("locale")
    }

    pub fn active(&self) -> Option<bool> {
        self.bool("active")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_models_decode_arrays() {
        let dividends: Dividends = serde_json::from_value(json!([
            {"symbol": "AAPL", "amount": 0.77, "exDate": "2019-08-09"},
            {"symbol": "AAPL", "amount": 0.73, "exDate": "2018-11-08"}
        ]))
        .unwrap();

        assert_eq!(dividends.len(), 2);
        assert_eq!(dividends[0].amount(), Some(0.77));
        assert_eq!(dividends[1].ex_date(), Some("2018-11-08"));
    }

    #[test]
    fn test_ticker_symbol_for_listing_and_snapshot() {
        let listing: Ticker =
            serde_json::from_value(json!({"ticker": "AAPL", "market": "STOCKS", "active": true}))
                .unwrap();
        assert_eq!(listing.symbol(), Some("AAPL"));
        assert_eq!(listing.active(), Some(true));

        let snapshot: Ticker = serde_json::from_value(json!({
            "status": "OK",
            "ticker": {"ticker": "MSFT", "todaysChange": 1.5}
        }))
        .unwrap();
        assert_eq!(snapshot.symbol(), Some("MSFT"));
    }

    #[test]
    fn test_condition_map_lookup() {
        let conditions: ConditionMap =
            serde_json::from_value(json!({"1": "Acquisition", "2": "Average Price Trade"}))
                .unwrap();
        assert_eq!(conditions.name_of(2), Some("Average Price Trade"));
        assert_eq!(conditions.name_of(99), None);
    }

    #[test]
    fn test_news_timestamp() {
        let news: News = serde_json::from_value(json!({
            "title": "Apple beats", "timestamp": "2019-06-06T15:30:00.000Z"
        }))
        .unwrap();
        assert_eq!(
            news.timestamp().unwrap().to_rfc3339(),
            "2019-06-06T15:30:00+00:00"
        );
    }
}
