//! Rollup aggregator: interprets a [`RollupPlan`] over a date-keyed mapping
//! of pre-aggregated daily summaries.
//!
//! Date filter → period bucketing → merge → projection. Like the record
//! pipeline this is pure and synchronous; buckets come out in chronological
//! first-member order.

pub mod bucket;
pub mod merge;
pub mod types;

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::Record;
use crate::diag::DiagnosticSink;
use crate::plan::RollupPlan;
use self::types::{DailySummary, PeriodBucket};

/// Runs a rollup plan and returns one flat row per period bucket.
pub fn run_rollup_plan(
    summaries: &BTreeMap<String, DailySummary>,
    plan: &RollupPlan,
    diag: &dyn DiagnosticSink,
) -> Vec<Record> {
    // BTreeMap iteration is lexically ascending, which for ISO dates is
    // chronological; buckets are then created in first-occurrence order.
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<&DailySummary>)> = Vec::new();

    for (date, summary) in summaries {
        if !bucket::in_range(date, plan.date_range.as_ref()) {
            continue;
        }
        let key = bucket::period_key(date, plan.aggregate_by, diag);
        match order.get(&key) {
            Some(&i) => buckets[i].1.push(summary),
            None => {
                order.insert(key.clone(), buckets.len());
                buckets.push((key, vec![summary]));
            }
        }
    }

    buckets
        .into_iter()
        .map(|(period, members)| {
            let merged = PeriodBucket {
                period,
                summary: merge::merge_summaries(&members),
            };
            project(merged, &plan.fields)
        })
        .collect()
}

/// Projects a merged bucket onto the requested field subset. An empty field
/// list keeps the full shape; requested fields absent from the merged row are
/// omitted, never zero-filled.
fn project(merged: PeriodBucket, fields: &[String]) -> Record {
    let Value::Object(full) = serde_json::to_value(&merged).unwrap_or_default() else {
        return Record::new();
    };
    if fields.is_empty() {
        return full;
    }

    let mut row = Record::new();
    row.insert("period".to_string(), Value::from(merged.period));
    for field in fields {
        if let Some(value) = full.get(field) {
            row.insert(field.clone(), value.clone());
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::MemorySink;
    use serde_json::json;

    fn summary(trip_count: u64) -> DailySummary {
        DailySummary {
            trip_count,
            member_trips: trip_count / 2,
            hourly_distribution: vec![0; 24],
            ..Default::default()
        }
    }

    fn index(days: &[(&str, u64)]) -> BTreeMap<String, DailySummary> {
        days.iter()
            .map(|&(date, n)| (date.to_string(), summary(n)))
            .collect()
    }

    #[test]
    fn test_default_plan_one_bucket_per_day() {
        let summaries = index(&[("2023-06-02", 20), ("2023-06-01", 10)]);
        let rows = run_rollup_plan(&summaries, &RollupPlan::default(), &MemorySink::new());

        assert_eq!(rows.len(), 2);
        // chronological despite insertion order
        assert_eq!(rows[0]["period"], json!("2023-06-01"));
        assert_eq!(rows[0]["trip_count"], json!(10));
        assert_eq!(rows[1]["period"], json!("2023-06-02"));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let summaries = index(&[
            ("2023-06-01", 1),
            ("2023-06-02", 2),
            ("2023-06-03", 3),
            ("2023-06-04", 4),
        ]);
        let plan: RollupPlan = serde_json::from_value(json!({
            "dateRange": {"start": "2023-06-02", "end": "2023-06-03"}
        }))
        .unwrap();
        let rows = run_rollup_plan(&summaries, &plan, &MemorySink::new());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["period"], json!("2023-06-02"));
        assert_eq!(rows[1]["period"], json!("2023-06-03"));
    }

    #[test]
    fn test_month_grain_merges_days() {
        let summaries = index(&[("2023-06-01", 10), ("2023-06-15", 20), ("2023-07-01", 5)]);
        let plan: RollupPlan =
            serde_json::from_value(json!({"aggregateBy": "month"})).unwrap();
        let rows = run_rollup_plan(&summaries, &plan, &MemorySink::new());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["period"], json!("2023-06"));
        assert_eq!(rows[0]["trip_count"], json!(30));
        assert_eq!(rows[1]["period"], json!("2023-07"));
        assert_eq!(rows[1]["trip_count"], json!(5));
    }

    #[test]
    fn test_week_grain_spans_year_boundary() {
        // Sunday 2023-12-31 and Friday 2023-12-29 share ISO week 2023-W52;
        // Monday 2024-01-01 starts 2024-W01.
        let summaries = index(&[("2023-12-29", 1), ("2023-12-31", 2), ("2024-01-01", 4)]);
        let plan: RollupPlan = serde_json::from_value(json!({"aggregateBy": "week"})).unwrap();
        let rows = run_rollup_plan(&summaries, &plan, &MemorySink::new());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["period"], json!("2023-W52"));
        assert_eq!(rows[0]["trip_count"], json!(3));
        assert_eq!(rows[1]["period"], json!("2024-W01"));
        assert_eq!(rows[1]["trip_count"], json!(4));
    }

    #[test]
    fn test_projection_subsets_fields() {
        let summaries = index(&[("2023-06-01", 10)]);
        let plan: RollupPlan = serde_json::from_value(json!({
            "fields": ["trip_count", "member_trips"]
        }))
        .unwrap();
        let rows = run_rollup_plan(&summaries, &plan, &MemorySink::new());

        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0]["period"], json!("2023-06-01"));
        assert_eq!(rows[0]["trip_count"], json!(10));
        assert_eq!(rows[0]["member_trips"], json!(5));
    }

    #[test]
    fn test_projection_omits_absent_fields() {
        let summaries = index(&[("2023-06-01", 10)]);
        let plan: RollupPlan = serde_json::from_value(json!({
            "fields": ["trip_count", "made_up_metric"]
        }))
        .unwrap();
        let rows = run_rollup_plan(&summaries, &plan, &MemorySink::new());

        assert!(!rows[0].contains_key("made_up_metric"));
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let summaries = index(&[("2023-06-01", 10), ("2023-06-02", 20)]);
        let plan: RollupPlan = serde_json::from_value(json!({"aggregateBy": "week"})).unwrap();

        let first = run_rollup_plan(&summaries, &plan, &MemorySink::new());
        let second = run_rollup_plan(&summaries, &plan, &MemorySink::new());
        assert_eq!(first, second);
    }
}
