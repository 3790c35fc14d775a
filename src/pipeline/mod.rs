//! Record pipeline: interprets a [`RecordPlan`] over an ordered sequence of
//! event records.
//!
//! Pure and synchronous; the caller supplies the fully materialized record
//! collection and a diagnostic sink. Malformed plan content never fails the
//! run — every stage degrades to its documented fallback.

pub mod calculate;
pub mod filter;
pub mod group;

use crate::Record;
use crate::coerce::number_or_zero;
use crate::diag::DiagnosticSink;
use crate::plan::{RecordPlan, SortDirection, SortSpec};

/// Runs the full calculate → filter → group/aggregate → order → limit plan.
/// An empty plan returns the input records unchanged.
pub fn run_record_plan(
    records: &[Record],
    plan: &RecordPlan,
    diag: &dyn DiagnosticSink,
) -> Vec<Record> {
    let rows = calculate::apply_calculations(records, &plan.calculate, diag);
    let rows = filter::apply_filters(rows, &plan.filters, diag);

    let mut rows = match &plan.group_by {
        Some(field) => group::group_and_aggregate(rows, field, plan.aggregate.as_ref()),
        None => rows,
    };

    if let Some(sort) = &plan.order_by {
        sort_rows(&mut rows, sort);
    }

    if let Some(limit) = plan.limit {
        rows.truncate(limit);
    }

    rows
}

/// Stable sort on the numeric coercion of the sort field; non-numeric values
/// coerce to 0, so ties keep their insertion order.
fn sort_rows(rows: &mut [Record], sort: &SortSpec) {
    rows.sort_by(|a, b| {
        let ka = number_or_zero(a.get(&sort.field));
        let kb = number_or_zero(b.get(&sort.field));
        match sort.direction {
            SortDirection::Asc => ka.total_cmp(&kb),
            SortDirection::Desc => kb.total_cmp(&ka),
        }
    });
}
