//! Stage 1 of the record pipeline: derived fields.
//!
//! Each calculate spec writes one named field onto a copy of every record, in
//! list order, so later stages can reference derived fields by name. The
//! caller's input records are never mutated.

use serde_json::Value;

use crate::Record;
use crate::coerce::{hour_component, parse_timestamp, weekday_name};
use crate::diag::DiagnosticSink;
use crate::plan::{CalculateOp, CalculateSpec};

/// Applies every calculate spec to a cloned copy of each record.
pub fn apply_calculations(
    records: &[Record],
    specs: &[CalculateSpec],
    diag: &dyn DiagnosticSink,
) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            let mut row = record.clone();
            for spec in specs {
                let value = compute(&row, spec.operation, diag);
                row.insert(spec.name.clone(), value);
            }
            row
        })
        .collect()
}

fn compute(record: &Record, op: CalculateOp, diag: &dyn DiagnosticSink) -> Value {
    match op {
        CalculateOp::DurationMinutes => duration_minutes(record, diag),
        CalculateOp::HourOfDay => field_str(record, "started_at")
            .and_then(hour_component)
            .map(Value::from)
            .unwrap_or(Value::Null),
        CalculateOp::IsRoundTrip => {
            Value::from(record.get("start_station_id") == record.get("end_station_id"))
        }
        CalculateOp::DayOfWeek => field_str(record, "started_at")
            .and_then(weekday_name)
            .map(Value::from)
            .unwrap_or(Value::Null),
        CalculateOp::Unknown => {
            diag.report("calculate", "unknown calculate operation, field left null");
            Value::Null
        }
    }
}

/// Whole minutes between `started_at` and `ended_at`, rounded half away from
/// zero. Unparsable timestamps degrade to null.
fn duration_minutes(record: &Record, diag: &dyn DiagnosticSink) -> Value {
    let start = field_str(record, "started_at").and_then(parse_timestamp);
    let end = field_str(record, "ended_at").and_then(parse_timestamp);

    match (start, end) {
        (Some(start), Some(end)) => {
            let minutes = (end - start).num_milliseconds() as f64 / 60_000.0;
            Value::from(minutes.round() as i64)
        }
        _ => {
            diag.report("calculate", "unparsable trip timestamps, duration left null");
            Value::Null
        }
    }
}

fn field_str<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}
