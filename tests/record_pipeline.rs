use serde_json::json;
use tripquery::Record;
use tripquery::diag::MemorySink;
use tripquery::pipeline::run_record_plan;
use tripquery::plan::RecordPlan;

fn record(fields: serde_json::Value) -> Record {
    fields.as_object().unwrap().clone()
}

/// A small shard of trips: three member rides from station A, two casual
/// rides from station B, spread across the day.
fn shard() -> Vec<Record> {
    vec![
        record(json!({
            "ride_id": "r1", "member_casual": "member",
            "start_station_name": "A", "start_station_id": "101",
            "end_station_name": "B", "end_station_id": "202",
            "started_at": "2023-01-03 08:00:00.000",
            "ended_at": "2023-01-03 08:12:00.000"
        })),
        record(json!({
            "ride_id": "r2", "member_casual": "member",
            "start_station_name": "A", "start_station_id": "101",
            "end_station_name": "A", "end_station_id": "101",
            "started_at": "2023-01-03 12:30:00.000",
            "ended_at": "2023-01-03 13:00:00.000"
        })),
        record(json!({
            "ride_id": "r3", "member_casual": "member",
            "start_station_name": "A", "start_station_id": "101",
            "end_station_name": "C", "end_station_id": "303",
            "started_at": "2023-01-03 17:45:00.000",
            "ended_at": "2023-01-03 17:51:00.000"
        })),
        record(json!({
            "ride_id": "r4", "member_casual": "casual",
            "start_station_name": "B", "start_station_id": "202",
            "end_station_name": "A", "end_station_id": "101",
            "started_at": "2023-01-07 11:10:00.000",
            "ended_at": "2023-01-07 11:40:30.000"
        })),
        record(json!({
            "ride_id": "r5", "member_casual": "casual",
            "start_station_name": "B", "start_station_id": "202",
            "end_station_name": "B", "end_station_id": "202",
            "started_at": "2023-01-07 18:00:00.000",
            "ended_at": "2023-01-07 19:02:00.000"
        })),
    ]
}

fn run(plan: serde_json::Value) -> Vec<Record> {
    let plan: RecordPlan = serde_json::from_value(plan).unwrap();
    run_record_plan(&shard(), &plan, &MemorySink::new())
}

#[test]
fn test_empty_plan_returns_records_unchanged() {
    let rows = run(json!({}));
    assert_eq!(rows, shard());
}

#[test]
fn test_calculate_then_filter_on_derived_field() {
    let rows = run(json!({
        "calculate": [{"name": "duration_minutes", "operation": "duration_minutes"}],
        "filters": [{"field": "duration_minutes", "operation": "greater_than", "value": 20}]
    }));

    // r2 (30 min), r4 (31 min after rounding 30.5), r5 (62 min)
    let ids: Vec<_> = rows.iter().map(|r| r["ride_id"].clone()).collect();
    assert_eq!(ids, vec![json!("r2"), json!("r4"), json!("r5")]);
    assert_eq!(rows[1]["duration_minutes"], json!(31));
}

#[test]
fn test_hour_between_and_membership_compose() {
    let rows = run(json!({
        "filters": [
            {"field": "started_at", "operation": "hour_between", "value": [12, 18]},
            {"field": "member_casual", "operation": "equals", "value": "member"}
        ]
    }));

    // hours 12 and 17 pass the half-open window; both happen to be members
    let ids: Vec<_> = rows.iter().map(|r| r["ride_id"].clone()).collect();
    assert_eq!(ids, vec![json!("r2"), json!("r3")]);
}

#[test]
fn test_group_count_sort_limit() {
    let rows = run(json!({
        "groupBy": "start_station_name",
        "aggregate": {"operation": "count"},
        "orderBy": {"field": "count", "direction": "desc"},
        "limit": 1
    }));

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["start_station_name"], json!("A"));
    assert_eq!(rows[0]["count"], json!(3));
}

#[test]
fn test_avg_duration_by_rider_category() {
    let rows = run(json!({
        "calculate": [{"name": "duration_minutes", "operation": "duration_minutes"}],
        "groupBy": "member_casual",
        "aggregate": {"operation": "avg", "field": "duration_minutes"}
    }));

    assert_eq!(rows.len(), 2);
    // members: (12 + 30 + 6) / 3 = 16
    assert_eq!(rows[0]["member_casual"], json!("member"));
    assert_eq!(rows[0]["avg"], json!(16));
    // casuals: (31 + 62) / 2 = 46.5 → 47
    assert_eq!(rows[1]["member_casual"], json!("casual"));
    assert_eq!(rows[1]["avg"], json!(47));
}

#[test]
fn test_round_trips_by_weekday() {
    let rows = run(json!({
        "calculate": [
            {"name": "is_round_trip", "operation": "is_round_trip"},
            {"name": "weekday", "operation": "day_of_week"}
        ],
        "filters": [{"field": "is_round_trip", "operation": "equals", "value": true}],
        "groupBy": "weekday"
    }));

    // r2 on Tuesday, r5 on Saturday
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["weekday"], json!("Tuesday"));
    assert_eq!(rows[0]["count"], json!(1));
    assert_eq!(rows[1]["weekday"], json!("Saturday"));
    assert_eq!(rows[1]["count"], json!(1));
}

#[test]
fn test_unknown_filter_operation_keeps_all_and_reports() {
    let plan: RecordPlan = serde_json::from_value(json!({
        "filters": [{"field": "ride_id", "operation": "regex_match", "value": "r.*"}]
    }))
    .unwrap();
    let sink = MemorySink::new();
    let rows = run_record_plan(&shard(), &plan, &sink);

    assert_eq!(rows.len(), 5);
    assert_eq!(sink.entries().len(), 5);
}

#[test]
fn test_determinism_across_runs() {
    let plan = json!({
        "calculate": [{"name": "hour", "operation": "hour_of_day"}],
        "groupBy": "hour",
        "aggregate": {"operation": "count"},
        "orderBy": {"field": "count", "direction": "desc"}
    });
    assert_eq!(run(plan.clone()), run(plan));
}
