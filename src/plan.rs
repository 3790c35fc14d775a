//! Plan model: typed representations of the two query plans produced by the
//! upstream planner.
//!
//! Plans arrive as JSON from an untrusted collaborator. Every stage is
//! optional; an absent stage is a pass-through. Operation names deserialize
//! into closed enums, with an explicit `Unknown` variant where the engine is
//! required to fail open instead of rejecting the plan.

use serde::Deserialize;
use serde_json::Value;

/// A declarative query over flat event records:
/// calculate → filter → group → aggregate → order → limit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordPlan {
    pub calculate: Vec<CalculateSpec>,
    pub filters: Vec<FilterSpec>,
    pub group_by: Option<String>,
    pub aggregate: Option<AggregateSpec>,
    pub order_by: Option<SortSpec>,
    pub limit: Option<usize>,
}

/// Declares one derived field to compute onto every record before filtering.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateSpec {
    pub name: String,
    pub operation: CalculateOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculateOp {
    DurationMinutes,
    HourOfDay,
    IsRoundTrip,
    DayOfWeek,
    /// Unrecognized operation name: computes nothing, reports a diagnostic.
    #[serde(other)]
    Unknown,
}

/// One predicate; all filters in a plan combine with logical AND.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub operation: FilterOp,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Equals,
    HourBetween,
    GreaterThan,
    LessThan,
    Contains,
    DayOfWeek,
    /// Unrecognized operation name: fail-open, the record is kept and a
    /// diagnostic is reported. Compatibility behavior, not a bug fix.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateSpec {
    pub operation: AggregateOp,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOp {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateOp {
    /// Key under which the reduced value lands in the output row.
    pub fn result_key(self) -> &'static str {
        match self {
            AggregateOp::Count => "count",
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A declarative query over pre-aggregated daily summaries:
/// date filter → period bucketing → merge → projection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RollupPlan {
    pub date_range: Option<DateRange>,
    pub aggregate_by: Grain,
    pub fields: Vec<String>,
}

/// Inclusive ISO date range, compared lexically against summary keys.
#[derive(Debug, Clone, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Time grain used to bucket days into periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}
