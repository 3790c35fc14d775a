pub mod coerce;
pub mod diag;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod rollup;

/// A single loosely-typed row: an event record on the way in, a result row on
/// the way out. Field names and types are whatever the upstream shard files
/// carried; the engines only coerce per operation.
pub type Record = serde_json::Map<String, serde_json::Value>;
