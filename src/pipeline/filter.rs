//! Stage 2 of the record pipeline: AND-composed filtering.
//!
//! A record survives iff every predicate holds; an empty filter list keeps
//! everything. Unknown operations fail open: the record is kept and the sink
//! hears about it.

use serde_json::Value;

use crate::Record;
use crate::coerce::{as_number, hour_component, stringify, weekday_name};
use crate::diag::DiagnosticSink;
use crate::plan::{FilterOp, FilterSpec};

/// Retains the records satisfying every filter in `specs`.
pub fn apply_filters(
    records: Vec<Record>,
    specs: &[FilterSpec],
    diag: &dyn DiagnosticSink,
) -> Vec<Record> {
    if specs.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| specs.iter().all(|spec| matches(record, spec, diag)))
        .collect()
}

fn matches(record: &Record, spec: &FilterSpec, diag: &dyn DiagnosticSink) -> bool {
    match spec.operation {
        FilterOp::Equals => record.get(&spec.field) == Some(&spec.value),
        FilterOp::HourBetween => hour_between(record, &spec.value),
        FilterOp::GreaterThan => compare(record.get(&spec.field), &spec.value).is_gt(),
        FilterOp::LessThan => compare(record.get(&spec.field), &spec.value).is_lt(),
        FilterOp::Contains => {
            let haystack = record.get(&spec.field).map(|v| stringify(v)).unwrap_or_default();
            haystack
                .to_lowercase()
                .contains(&stringify(&spec.value).to_lowercase())
        }
        FilterOp::DayOfWeek => {
            let weekday = record
                .get("started_at")
                .and_then(Value::as_str)
                .and_then(weekday_name);
            weekday.as_deref() == Some(stringify(&spec.value).as_str())
        }
        FilterOp::Unknown => {
            // Fail-open compatibility behavior: keep the record.
            diag.report("filter", "unknown filter operation, record kept");
            true
        }
    }
}

/// Half-open hour test `lo <= hour < hi` against the start timestamp. The
/// hour is recomputed from the raw string regardless of any prior
/// `hour_of_day` calculate step; records without a parsable hour fail.
fn hour_between(record: &Record, bounds: &Value) -> bool {
    let hour = record
        .get("started_at")
        .and_then(Value::as_str)
        .and_then(hour_component);
    let (Some(hour), Some(bounds)) = (hour, bounds.as_array()) else {
        return false;
    };
    let (Some(lo), Some(hi)) = (
        bounds.first().and_then(as_number),
        bounds.get(1).and_then(as_number),
    ) else {
        return false;
    };
    lo <= hour as f64 && (hour as f64) < hi
}

/// Ordering used by greater_than / less_than: numeric when both operands are
/// JSON numbers, otherwise lexicographic on the stringified values. The mixed
/// case is implementation-defined by contract.
fn compare(field: Option<&Value>, rhs: &Value) -> std::cmp::Ordering {
    match (field.and_then(as_number), as_number(rhs)) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        _ => {
            let lhs = field.map(|v| stringify(v)).unwrap_or_default();
            lhs.cmp(&stringify(rhs))
        }
    }
}
