//! Tests for pivot table state loading and selection bookkeeping.

mod common;

use common::{agg, slice};
use pivot_query::pivot::{
    generate_query_from_state, AggregationFunction, PivotTableState, RegularColumn,
    SelectedAggregations, SortDirection, TableColumn, TrackTable,
};

const STATE_TOML: &str = r#"
constrain_to_area = true

[selection_area]
start_sec = 0.25
end_sec = 0.75
tracks = ["t1"]

[[selected_pivots]]
table = "process"
column = "name"

[[selected_slice_pivots]]
kind = "regular"
table = "slice"
column = "name"

[[selected_slice_pivots]]
kind = "argument"
argument = "debug.id"

[[selected_aggregations]]
function = "SUM"
column = { kind = "regular", table = "slice", column = "dur" }

[[selected_aggregations]]
function = "COUNT"
column = { kind = "regular", table = "slice", column = "dur" }

[sort_criteria]
order = "DESC"
column = { kind = "regular", table = "slice", column = "dur" }
"#;

#[test]
fn test_load_state_from_toml() {
    let state: PivotTableState = toml::from_str(STATE_TOML).unwrap();

    assert_eq!(state.selected_pivots, vec![RegularColumn::new("process", "name")]);
    assert_eq!(
        state.selected_slice_pivots,
        vec![slice("name"), TableColumn::argument("debug.id")]
    );
    assert_eq!(state.selected_aggregations.len(), 2);
    assert!(state.selected_aggregations.contains_key("SUM:slice.dur"));
    assert!(state.selected_aggregations.contains_key("COUNT:slice.dur"));
    assert_eq!(state.sort_criteria.as_ref().unwrap().order, SortDirection::Desc);
    assert_eq!(state.pivot_count(), 3);

    let tracks = TrackTable::new().with_track("t1", [5]);
    let query = generate_query_from_state(&state, &tracks).unwrap();
    assert!(query.text.contains("track_id IN (5)"));
    assert!(query.text.ends_with("ORDER BY agg_0 DESC, agg_1 DESC"));
}

#[test]
fn test_missing_fields_take_defaults() {
    let state: PivotTableState = toml::from_str("").unwrap();

    assert_eq!(state, PivotTableState::default());
    assert!(state.constrain_to_area);
    assert!(state.selection_area.is_none());
    assert!(state.sort_criteria.is_none());
}

#[test]
fn test_duplicate_aggregations_collapse_on_load() {
    let json = r#"[
        {"function": "MAX", "column": {"kind": "argument", "argument": "x"}},
        {"function": "MIN", "column": {"kind": "argument", "argument": "x"}},
        {"function": "MAX", "column": {"kind": "argument", "argument": "x"}}
    ]"#;
    let selected: SelectedAggregations = serde_json::from_str(json).unwrap();

    let keys: Vec<String> = selected.iter().map(|a| a.key()).collect();
    assert_eq!(keys, vec!["MAX:arg:x", "MIN:arg:x"]);
}

#[test]
fn test_reselecting_keeps_position() {
    let mut selected = SelectedAggregations::new();
    selected.insert(agg(AggregationFunction::Sum, slice("dur")));
    selected.insert(agg(AggregationFunction::Avg, slice("dur")));

    let replaced = selected.insert(agg(AggregationFunction::Sum, slice("dur")));

    assert!(replaced.is_some());
    assert_eq!(selected.len(), 2);
    assert_eq!(selected.values()[0].key(), "SUM:slice.dur");

    assert!(selected.remove("SUM:slice.dur").is_some());
    assert_eq!(selected.values()[0].key(), "AVG:slice.dur");
    assert!(selected.get("SUM:slice.dur").is_none());
}

#[test]
fn test_state_round_trips_through_json() {
    let state = PivotTableState::new()
        .with_pivot(RegularColumn::new("thread", "tid"))
        .with_slice_pivot(TableColumn::argument("k"))
        .with_aggregation(agg(AggregationFunction::Min, slice("ts")))
        .with_sort(slice("ts"), SortDirection::Asc)
        .constrained_to_area(false);

    let json = serde_json::to_string(&state).unwrap();
    let loaded: PivotTableState = serde_json::from_str(&json).unwrap();

    assert_eq!(loaded, state);
}
