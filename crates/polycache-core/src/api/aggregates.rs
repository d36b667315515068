//! Conversion of v2 aggregate responses to the v1 layout.
//!
//! v2 bars live under `results` with single-letter field codes. The v1
//! layout keeps them under `ticks`, carries the code table under `map`,
//! tags the bar size as `aggType`, and gives every bar a local calendar
//! day `d`.

use chrono::{Local, TimeZone};
use serde_json::{Map, Value};

use super::ApiError;

/// Field codes used by v2 aggregate bars.
const V2_FIELD_MAP: [(&str, &str); 8] = [
    ("o", "open"),
    ("c", "close"),
    ("h", "high"),
    ("l", "low"),
    ("v", "volume"),
    ("t", "timestamp"),
    ("d", "day"),
    ("n", "numberOfWindows"),
];

pub fn v2_field_map() -> Map<String, Value> {
    V2_FIELD_MAP
        .iter()
        .map(|(code, name)| (code.to_string(), Value::String(name.to_string())))
        .collect()
}

/// `aggType` for a requested timeframe. Unknown timeframes count as daily.
pub fn agg_type(timeframe: &str) -> &'static str {
    match timeframe {
        "minute" => "min",
        _ => "daily",
    }
}

/// Local calendar day (`YYYY-MM-DD`) of a millisecond epoch timestamp.
pub fn local_day(timestamp_ms: i64) -> Option<String> {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|ts| ts.format("%Y-%m-%d").to_string())
}

pub fn v2_to_v1(raw: Value, timeframe: &str) -> Result<Value, ApiError> {
    let Value::Object(mut raw) = raw else {
        return Err(ApiError::InvalidResponse(
            "aggregate response is not a JSON object".to_string(),
        ));
    };

    let mut ticks = match raw.remove("results") {
        Some(Value::Array(ticks)) => ticks,
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            return Err(ApiError::InvalidResponse(
                "aggregate `results` is not a list".to_string(),
            ))
        }
    };

    for tick in ticks.iter_mut().filter_map(Value::as_object_mut) {
        let timestamp = tick
            .get("t")
            .and_then(|t| t.as_i64().or_else(|| t.as_f64().map(|f| f as i64)));
        if let Some(day) = timestamp.and_then(local_day) {
            tick.insert("d".to_string(), Value::String(day));
        }
    }

    raw.insert("map".to_string(), Value::Object(v2_field_map()));
    raw.insert("ticks".to_string(), Value::Array(ticks));
    raw.insert(
        "aggType".to_string(),
        Value::String(agg_type(timeframe).to_string()),
    );
    Ok(Value::Object(raw))
}
