//! Data types for the rollup aggregator.

use serde::{Deserialize, Serialize};

/// One pre-aggregated day of trips, keyed externally by its ISO date. Every
/// field defaults on deserialize because the index files are untrusted input.
/// The 24-bucket histogram is assumed to sum to `trip_count`; that invariant
/// is not re-verified here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailySummary {
    pub trip_count: u64,
    pub member_trips: u64,
    pub casual_trips: u64,
    pub bike_types: BikeTypes,
    pub peak_hour: u32,
    pub hourly_distribution: Vec<u64>,
    pub top_start_stations: Vec<StationCount>,
    pub top_end_stations: Vec<StationCount>,
    pub top_routes: Vec<RouteCount>,
    pub bounding_box: BoundingBox,
}

/// Trip counts split by bike type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BikeTypes {
    pub classic: u64,
    pub electric: u64,
}

/// One entry of a top-K station list, descending by count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationCount {
    pub name: String,
    pub count: u64,
}

/// One entry of a top-K route list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCount {
    pub from: String,
    pub to: String,
    pub count: u64,
}

/// Geographic envelope of observed coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// The merge of all member days of one period bucket. Same shape as a daily
/// summary plus the bucket key, serialized as one flat row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    pub period: String,
    #[serde(flatten)]
    pub summary: DailySummary,
}
