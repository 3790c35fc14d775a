//! Merging member daily summaries into one period bucket.

use std::collections::HashMap;

use super::types::{BoundingBox, DailySummary, RouteCount, StationCount};

/// Merged top-K lists keep at most this many entries, matching the per-day
/// input lists.
const TOP_K: usize = 10;

const HOURS: usize = 24;

/// Reduces the member days of one bucket into a single summary.
///
/// Scalar counts and the hourly histogram sum element-wise; the peak hour is
/// rescanned from the merged histogram (ties resolve to the lowest hour);
/// top-K lists re-rank the summed per-day counts; the bounding box takes the
/// coordinate extrema.
///
/// Known limitation: only each day's top 10 stations/routes are available as
/// input, so merged totals undercount entities that fell outside a day's
/// top 10. Preserved as-is.
pub fn merge_summaries(members: &[&DailySummary]) -> DailySummary {
    let mut merged = DailySummary {
        hourly_distribution: vec![0; HOURS],
        ..Default::default()
    };

    for day in members {
        merged.trip_count += day.trip_count;
        merged.member_trips += day.member_trips;
        merged.casual_trips += day.casual_trips;
        merged.bike_types.classic += day.bike_types.classic;
        merged.bike_types.electric += day.bike_types.electric;

        for (hour, total) in merged.hourly_distribution.iter_mut().enumerate() {
            *total += day.hourly_distribution.get(hour).copied().unwrap_or(0);
        }
    }

    merged.peak_hour = peak_hour(&merged.hourly_distribution);
    merged.top_start_stations = merge_stations(members.iter().map(|d| &d.top_start_stations));
    merged.top_end_stations = merge_stations(members.iter().map(|d| &d.top_end_stations));
    merged.top_routes = merge_routes(members.iter().map(|d| &d.top_routes));
    merged.bounding_box = merge_bounds(members);

    merged
}

/// Index of the histogram maximum; the first occurrence wins on ties.
fn peak_hour(histogram: &[u64]) -> u32 {
    let mut peak = 0usize;
    for (hour, &count) in histogram.iter().enumerate() {
        if count > histogram[peak] {
            peak = hour;
        }
    }
    peak as u32
}

fn merge_stations<'a>(lists: impl Iterator<Item = &'a Vec<StationCount>>) -> Vec<StationCount> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    for list in lists {
        for entry in list {
            *totals.entry(entry.name.clone()).or_default() += entry.count;
        }
    }

    let mut ranked: Vec<StationCount> = totals
        .into_iter()
        .map(|(name, count)| StationCount { name, count })
        .collect();
    // Name breaks count ties so output is deterministic.
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_K);
    ranked
}

fn merge_routes<'a>(lists: impl Iterator<Item = &'a Vec<RouteCount>>) -> Vec<RouteCount> {
    let mut totals: HashMap<(String, String), u64> = HashMap::new();
    for list in lists {
        for entry in list {
            *totals
                .entry((entry.from.clone(), entry.to.clone()))
                .or_default() += entry.count;
        }
    }

    let mut ranked: Vec<RouteCount> = totals
        .into_iter()
        .map(|((from, to), count)| RouteCount { from, to, count })
        .collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });
    ranked.truncate(TOP_K);
    ranked
}

fn merge_bounds(members: &[&DailySummary]) -> BoundingBox {
    let mut bounds = match members.first() {
        Some(first) => first.bounding_box,
        None => return BoundingBox::default(),
    };
    for day in &members[1..] {
        bounds.north = bounds.north.max(day.bounding_box.north);
        bounds.south = bounds.south.min(day.bounding_box.south);
        bounds.east = bounds.east.max(day.bounding_box.east);
        bounds.west = bounds.west.min(day.bounding_box.west);
    }
    bounds
}
