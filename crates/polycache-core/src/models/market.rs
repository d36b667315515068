//! Trades, quotes and aggregate bars.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use super::Entity;

entity_model!(
    /// A single trade, either from `last_trade` or a historic tick.
    Trade
);

impl Trade {
    pub fn price(&self) -> Option<f64> {
        self.f64("price")
    }

    pub fn size(&self) -> Option<i64> {
        self.i64("size")
    }

    pub fn exchange(&self) -> Option<i64> {
        self.i64("exchange")
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_ms("timestamp")
    }
}

entity_model!(
    /// A single NBBO quote.
    Quote
);

impl Quote {
    pub fn ask_price(&self) -> Option<f64> {
        self.f64("askprice")
    }

    pub fn ask_size(&self) -> Option<i64> {
        self.i64("asksize")
    }

    pub fn bid_price(&self) -> Option<f64> {
        self.f64("bidprice")
    }

    pub fn bid_size(&self) -> Option<i64> {
        self.i64("bidsize")
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_ms("timestamp")
    }
}

entity_model!(
    /// One aggregate bar with full field names.
    Agg
);

impl Agg {
    pub fn open(&self) -> Option<f64> {
        self.f64("open")
    }

    pub fn high(&self) -> Option<f64> {
        self.f64("high")
    }

    pub fn low(&self) -> Option<f64> {
        self.f64("low")
    }

    pub fn close(&self) -> Option<f64> {
        self.f64("close")
    }

    pub fn volume(&self) -> Option<f64> {
        self.f64("volume")
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_ms("timestamp")
    }

    /// Calendar day of the bar, when the response carries one.
    pub fn day(&self) -> Option<NaiveDate> {
        self.str("day")
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// Ticks of a historic response, remapped through its `map` table.
fn remapped_ticks<T: From<Entity>>(raw: &Entity) -> Vec<T> {
    let empty = Map::new();
    let map = raw.get("map").and_then(Value::as_object).unwrap_or(&empty);

    raw.get("ticks")
        .and_then(Value::as_array)
        .map(|ticks| {
            ticks
                .iter()
                .filter_map(Value::as_object)
                .map(|tick| T::from(Entity::new(tick.clone()).remapped(map)))
                .collect()
        })
        .unwrap_or_default()
}

entity_model!(
    /// Historic trades for one symbol and day.
    Trades
);

impl Trades {
    pub fn symbol(&self) -> Option<&str> {
        self.str("symbol")
    }

    pub fn ticks(&self) -> Vec<Trade> {
        remapped_ticks(&self.0)
    }
}

entity_model!(
    /// Historic quotes for one symbol and day.
    Quotes
);

impl Quotes {
    pub fn symbol(&self) -> Option<&str> {
        self.str("symbol")
    }

    pub fn ticks(&self) -> Vec<Quote> {
        remapped_ticks(&self.0)
    }
}

entity_model!(
    /// Aggregate bars in the v1 layout (`map`, `ticks`, `aggType`).
    Aggs
);

impl Aggs {
    pub fn symbol(&self) -> Option<&str> {
        self.str("symbol").or_else(|| self.str("ticker"))
    }

    /// `"daily"` or `"min"`.
    pub fn agg_type(&self) -> Option<&str> {
        self.str("aggType")
    }

    pub fn ticks(&self) -> Vec<Agg> {
        remapped_ticks(&self.0)
    }
}
