//! Tests for the outer pivot query: validation, rollups, joins, sorting.

mod common;

use std::cell::Cell;

use common::{agg, assert_valid_sql, base_state, process_pid, slice, thread_name, tracks};
use insta::assert_snapshot;
use pivot_query::config::GeneratorSettings;
use pivot_query::pivot::{
    generate_query_from_state, to_ns, AggregationFunction, Area, PivotQueryGenerator,
    PivotTableState, QueryGeneratorError, ResolvedArea, SortDirection, TableColumn,
};

fn no_tracks(area: &Area) -> ResolvedArea {
    ResolvedArea::new(to_ns(area.start_sec), to_ns(area.end_sec), [])
}

// =============================================================================
// Preconditions
// =============================================================================

#[test]
fn test_missing_area_is_rejected() {
    let state = PivotTableState::new()
        .with_slice_pivot(slice("name"))
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")));

    let err = generate_query_from_state(&state, &tracks()).unwrap_err();
    assert_eq!(err, QueryGeneratorError::MissingArea);
    assert_eq!(err.to_string(), "Should not be called without area");
}

#[test]
fn test_no_aggregations_is_rejected() {
    let state = base_state().with_slice_pivot(slice("name"));

    let err = generate_query_from_state(&state, &tracks()).unwrap_err();
    assert_eq!(err, QueryGeneratorError::NoAggregations);
    assert_eq!(err.to_string(), "No aggregations selected");
}

#[test]
fn test_no_pivots_is_rejected() {
    let state = base_state().with_aggregation(agg(AggregationFunction::Sum, slice("dur")));

    let err = generate_query_from_state(&state, &tracks()).unwrap_err();
    assert_eq!(err, QueryGeneratorError::NoPivots);
    assert_eq!(err.to_string(), "No pivots selected");
}

#[test]
fn test_joined_pivot_alone_is_enough() {
    let state = base_state()
        .with_pivot(thread_name())
        .with_aggregation(agg(AggregationFunction::Count, slice("dur")));

    assert!(generate_query_from_state(&state, &tracks()).is_ok());
}

#[test]
fn test_rejection_does_not_resolve_area() {
    let calls = Cell::new(0);
    let resolver = |area: &Area| {
        calls.set(calls.get() + 1);
        no_tracks(area)
    };

    let state = base_state().with_slice_pivot(slice("name"));
    assert_eq!(
        generate_query_from_state(&state, &resolver),
        Err(QueryGeneratorError::NoAggregations)
    );
    assert_eq!(calls.get(), 0);

    let state = state.with_aggregation(agg(AggregationFunction::Sum, slice("dur")));
    assert!(generate_query_from_state(&state, &resolver).is_ok());
    assert_eq!(calls.get(), 1);
}

// =============================================================================
// Query text
// =============================================================================

#[test]
fn test_single_slice_pivot_query() {
    let state = base_state()
        .with_slice_pivot(slice("name"))
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")));

    let query = generate_query_from_state(&state, &no_tracks).unwrap();

    let expected = [
        "SELECT",
        "  preaggregated.name,",
        "  SUM(preaggregated.agg_0) AS agg_0",
        "FROM (",
        "  SELECT",
        "    name,",
        "    SUM(dur) AS agg_0",
        "  FROM slice",
        "  WHERE ts + dur > 1500000000 AND ts < 2000000000 AND FALSE",
        "  GROUP BY name",
        ") AS preaggregated",
        "GROUP BY preaggregated.name",
    ]
    .join("\n");
    assert_eq!(query.text, expected);
    assert_valid_sql(&query.text);
}

#[test]
fn test_joined_pivots_query() {
    let state = base_state()
        .with_pivot(thread_name())
        .with_pivot(process_pid())
        .with_slice_pivot(TableColumn::argument("chrome.url"))
        .with_aggregation(agg(AggregationFunction::Count, slice("dur")))
        .with_aggregation(agg(AggregationFunction::Max, slice("ts")))
        .with_sort(slice("dur"), SortDirection::Desc);

    let query = generate_query_from_state(&state, &tracks()).unwrap();

    assert_snapshot!(query.text, @r"
    SELECT
      thread.name,
      process.pid,
      preaggregated.pivot_argument_0,
      SUM(preaggregated.agg_0) AS agg_0,
      MAX(preaggregated.agg_1) AS agg_1
    FROM (
      SELECT
        extract_arg(arg_set_id, 'chrome.url') AS pivot_argument_0,
        track_id,
        COUNT() AS agg_0,
        MAX(ts) AS agg_1
      FROM slice
      WHERE ts + dur > 1500000000 AND ts < 2000000000 AND track_id IN (4, 9)
      GROUP BY pivot_argument_0, track_id
    ) AS preaggregated
    LEFT JOIN thread_track ON thread_track.id = preaggregated.track_id
    LEFT JOIN thread USING (utid)
    LEFT JOIN process USING (upid)
    GROUP BY thread.name, process.pid, preaggregated.pivot_argument_0
    ORDER BY agg_0 DESC
    ");
    assert_valid_sql(&query.text);
}

#[test]
fn test_count_rolls_up_to_sum() {
    let state = base_state()
        .with_slice_pivot(slice("name"))
        .with_aggregation(agg(AggregationFunction::Count, slice("name")));

    let query = generate_query_from_state(&state, &tracks()).unwrap();

    assert!(query.text.contains("    COUNT() AS agg_0"));
    assert!(query.text.contains("  SUM(preaggregated.agg_0) AS agg_0"));
    assert!(!query.text.contains("COUNT(preaggregated"));
}

#[test]
fn test_other_functions_are_not_rewritten() {
    let state = base_state()
        .with_slice_pivot(slice("name"))
        .with_aggregation(agg(AggregationFunction::Min, slice("ts")))
        .with_aggregation(agg(AggregationFunction::Avg, slice("dur")));

    let query = generate_query_from_state(&state, &tracks()).unwrap();

    assert!(query.text.contains("MIN(preaggregated.agg_0) AS agg_0"));
    assert!(query.text.contains("AVG(preaggregated.agg_1) AS agg_1"));
    assert_valid_sql(&query.text);
}

#[test]
fn test_argument_pivots_get_distinct_aliases() {
    let state = base_state()
        .with_slice_pivot(TableColumn::argument("same"))
        .with_slice_pivot(slice("name"))
        .with_slice_pivot(TableColumn::argument("same"))
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")));

    let query = generate_query_from_state(&state, &tracks()).unwrap();

    assert!(query.text.contains("extract_arg(arg_set_id, 'same') AS pivot_argument_0"));
    assert!(query.text.contains("extract_arg(arg_set_id, 'same') AS pivot_argument_1"));
    assert!(query.text.contains(
        "GROUP BY preaggregated.pivot_argument_0, preaggregated.name, preaggregated.pivot_argument_1"
    ));
    assert_valid_sql(&query.text);
}

#[test]
fn test_no_join_without_joined_pivots() {
    let state = base_state()
        .with_slice_pivot(slice("name"))
        .with_slice_pivot(TableColumn::argument("cat"))
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")));

    let query = generate_query_from_state(&state, &tracks()).unwrap();

    assert!(!query.text.contains("JOIN"));
    assert!(!query.text.contains("track_id,"));
    assert!(!query.text.contains(", track_id"));
}

#[test]
fn test_unconstrained_query_has_no_filter() {
    let state = base_state()
        .constrained_to_area(false)
        .with_slice_pivot(slice("name"))
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")));

    let query = generate_query_from_state(&state, &tracks()).unwrap();

    assert!(!query.text.contains("WHERE"));
    assert_valid_sql(&query.text);
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn test_unmatched_sort_has_no_order_by() {
    let state = base_state()
        .with_slice_pivot(slice("name"))
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")))
        .with_sort(TableColumn::argument("dur"), SortDirection::Asc);

    let query = generate_query_from_state(&state, &tracks()).unwrap();

    assert!(!query.text.contains("ORDER BY"));
}

#[test]
fn test_matched_sort_orders_by_alias() {
    let state = base_state()
        .with_slice_pivot(slice("name"))
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")))
        .with_aggregation(agg(AggregationFunction::Max, slice("depth")))
        .with_sort(slice("depth"), SortDirection::Asc);

    let query = generate_query_from_state(&state, &tracks()).unwrap();

    assert_eq!(query.text.matches("ORDER BY").count(), 1);
    assert!(query.text.ends_with("\nORDER BY agg_1 ASC"));
    assert_valid_sql(&query.text);
}

// =============================================================================
// Metadata and determinism
// =============================================================================

#[test]
fn test_metadata_lists_joined_pivots_first() {
    let state = base_state()
        .with_slice_pivot(slice("name"))
        .with_pivot(process_pid())
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")))
        .with_aggregation(agg(AggregationFunction::Count, slice("dur")));

    let query = generate_query_from_state(&state, &tracks()).unwrap();
    let metadata = &query.metadata;

    assert_eq!(
        metadata.pivot_columns,
        vec![TableColumn::Regular(process_pid()), slice("name")]
    );
    assert_eq!(
        metadata.aggregation_columns,
        state.selected_aggregations.values().to_vec()
    );
    assert_eq!(metadata.aggregation_index(0), 2);
    assert_eq!(metadata.aggregation_index(1), 3);
    assert_eq!(metadata.column_count(), 4);

    // The SELECT list follows the same order.
    let pid = query.text.find("process.pid").unwrap();
    let name = query.text.find("preaggregated.name").unwrap();
    assert!(pid < name);
}

#[test]
fn test_generation_is_deterministic() {
    let build = || {
        base_state()
            .with_pivot(thread_name())
            .with_slice_pivot(TableColumn::argument("k"))
            .with_aggregation(agg(AggregationFunction::Avg, slice("dur")))
            .with_sort(slice("dur"), SortDirection::Desc)
    };

    let first = generate_query_from_state(&build(), &tracks()).unwrap();
    let second = generate_query_from_state(&build(), &tracks()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_metadata_serializes_to_json() {
    let state = base_state()
        .with_slice_pivot(TableColumn::argument("k"))
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")));

    let query = generate_query_from_state(&state, &tracks()).unwrap();
    let json = serde_json::to_value(&query.metadata).unwrap();

    assert_eq!(json["pivot_columns"][0]["kind"], "argument");
    assert_eq!(json["pivot_columns"][0]["argument"], "k");
    assert_eq!(json["aggregation_columns"][0]["function"], "SUM");
    assert_eq!(json["aggregation_columns"][0]["column"]["table"], "slice");
}

// =============================================================================
// Settings
// =============================================================================

#[test]
fn test_custom_alias_and_compact_layout() {
    let state = base_state()
        .with_pivot(thread_name())
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")));
    let resolver = tracks();
    let generator = PivotQueryGenerator::new(&resolver).with_settings(GeneratorSettings {
        inner_alias: "pre".to_string(),
        pretty: false,
    });

    let query = generator.generate(&state).unwrap();

    assert!(!query.text.contains('\n'));
    assert!(query.text.starts_with("SELECT thread.name, SUM(pre.agg_0) AS agg_0 FROM ( SELECT"));
    assert!(query.text.contains(") AS pre LEFT JOIN thread_track ON thread_track.id = pre.track_id"));
    assert_valid_sql(&query.text);
}

#[test]
fn test_area_ids_come_from_resolver() {
    let state = PivotTableState::new()
        .with_area(Area::new(0.0, 1.0, vec!["gpu".into(), "main".into()]))
        .with_slice_pivot(slice("name"))
        .with_aggregation(agg(AggregationFunction::Sum, slice("dur")));

    let query = generate_query_from_state(&state, &tracks()).unwrap();

    assert!(query.text.contains("track_id IN (4, 9, 12)"));
}
