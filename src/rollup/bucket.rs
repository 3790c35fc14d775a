//! Date filtering and period bucketing for the rollup aggregator.

use chrono::{Datelike, NaiveDate};

use crate::diag::DiagnosticSink;
use crate::plan::{DateRange, Grain};

/// Retains the dates inside the inclusive range. Keys are ISO `YYYY-MM-DD`,
/// so lexical comparison equals chronological comparison; malformed range
/// bounds are compared as-is (caller contract).
pub fn in_range(date: &str, range: Option<&DateRange>) -> bool {
    match range {
        Some(range) => range.start.as_str() <= date && date <= range.end.as_str(),
        None => true,
    }
}

/// Period key for a date at the given grain. A date that fails to parse
/// buckets under its raw string with a diagnostic, never a failure.
pub fn period_key(date: &str, grain: Grain, diag: &dyn DiagnosticSink) -> String {
    if grain == Grain::Day {
        return date.to_string();
    }
    let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        diag.report("rollup", "unparsable summary date, bucketed as-is");
        return date.to_string();
    };
    match grain {
        Grain::Day => date.to_string(),
        Grain::Week => {
            // ISO week (Thursday-anchored), so year-boundary days land in the
            // week of the year that owns their Thursday.
            let week = parsed.iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
        Grain::Month => format!("{:04}-{:02}", parsed.year(), parsed.month()),
        Grain::Quarter => format!("{:04}-Q{}", parsed.year(), parsed.month().div_ceil(3)),
        Grain::Year => format!("{:04}", parsed.year()),
    }
}
