//! Value coercion and timestamp helpers shared by both engines.
//!
//! Input rows are untrusted JSON, so every numeric or string use of a field
//! goes through one of these functions instead of assuming a type.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Timestamps in shard rows use this fixed format with millisecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Numeric view of a JSON value. `None` for anything but a number.
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Numeric coercion with the documented fallback: missing or non-numeric
/// fields coerce to 0 (sum/avg/order semantics).
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(as_number).unwrap_or(0.0)
}

/// Stringifies a value for grouping keys and substring tests. Strings are
/// used as-is; everything else uses its JSON rendering (`null`, `true`, `12`).
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Converts a computed number back into a JSON value. Integral results come
/// out as integers; non-finite results have no JSON representation and come
/// out as `null` (the ±∞ sentinel is documented, not clamped).
pub fn number_value(x: f64) -> Value {
    if x.is_finite() && x.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(&x) {
        Value::from(x as i64)
    } else {
        serde_json::Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Parses a fixed-format `YYYY-MM-DD HH:MM:SS.mmm` timestamp.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

/// Extracts the hour (0–23) positionally from a fixed-format timestamp
/// string. No calendar math involved.
pub fn hour_component(raw: &str) -> Option<u32> {
    let hour: u32 = raw.get(11..13)?.parse().ok()?;
    (hour < 24).then_some(hour)
}

/// Weekday name (`"Sunday"`…`"Saturday"`) of a timestamp's calendar date.
pub fn weekday_name(raw: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()?;
    Some(date.format("%A").to_string())
}
