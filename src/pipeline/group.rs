//! Stage 3 of the record pipeline: grouping and aggregation.
//!
//! Groups appear in the output in first-occurrence order of their key. With
//! an aggregate spec each group reduces to a single row; without one the
//! group row still carries its member count.

use std::collections::HashMap;

use serde_json::Value;

use crate::Record;
use crate::coerce::{as_number, number_value, stringify};
use crate::plan::{AggregateOp, AggregateSpec};

/// Group key used when a record lacks the groupBy field entirely.
const MISSING_KEY: &str = "unknown";

struct Group {
    key: String,
    members: Vec<Record>,
}

/// Partitions records by the stringified value of `field` and reduces each
/// group per `aggregate`.
pub fn group_and_aggregate(
    records: Vec<Record>,
    field: &str,
    aggregate: Option<&AggregateSpec>,
) -> Vec<Record> {
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for record in records {
        let key = record
            .get(field)
            .map(stringify)
            .unwrap_or_else(|| MISSING_KEY.to_string());
        match order.get(&key) {
            Some(&i) => groups[i].members.push(record),
            None => {
                order.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    members: vec![record],
                });
            }
        }
    }

    groups
        .into_iter()
        .map(|group| {
            let mut row = Record::new();
            row.insert(field.to_string(), Value::from(group.key));
            match aggregate {
                Some(spec) => {
                    row.insert(spec.operation.result_key().to_string(), reduce(spec, &group.members));
                }
                None => {
                    row.insert("count".to_string(), Value::from(group.members.len()));
                }
            }
            row
        })
        .collect()
}

fn reduce(spec: &AggregateSpec, members: &[Record]) -> Value {
    let field = spec.field.as_deref().unwrap_or_default();
    let values = || members.iter().map(|r| r.get(field));

    match spec.operation {
        AggregateOp::Count => Value::from(members.len()),
        AggregateOp::Sum => number_value(sum(values())),
        AggregateOp::Avg => {
            let avg = sum(values()) / members.len() as f64;
            Value::from(avg.round() as i64)
        }
        // Missing fields contribute the identity, so an all-missing group
        // yields a non-finite sentinel (serialized as null).
        AggregateOp::Min => number_value(
            values().fold(f64::INFINITY, |acc, v| {
                acc.min(v.and_then(as_number).unwrap_or(f64::INFINITY))
            }),
        ),
        AggregateOp::Max => number_value(
            values().fold(f64::NEG_INFINITY, |acc, v| {
                acc.max(v.and_then(as_number).unwrap_or(f64::NEG_INFINITY))
            }),
        ),
    }
}

/// Sum with non-numeric members coercing to 0.
fn sum<'a>(values: impl Iterator<Item = Option<&'a Value>>) -> f64 {
    values.map(|v| v.and_then(as_number).unwrap_or(0.0)).sum()
}
