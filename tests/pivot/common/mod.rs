//! Shared fixtures for pivot query tests.

#![allow(dead_code)]

use pivot_query::pivot::{
    Aggregation, AggregationFunction, Area, PivotTableState, RegularColumn, TableColumn,
    TrackTable,
};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

/// Parses `sql` as SQLite, panicking with the query text on failure.
pub fn assert_valid_sql(sql: &str) {
    if let Err(e) = Parser::parse_sql(&SQLiteDialect {}, sql) {
        panic!("Invalid SQL: {}\nSQL:\n{}", e, sql);
    }
}

/// UI tracks "main" (ids 4, 9) and "gpu" (id 12).
pub fn tracks() -> TrackTable {
    TrackTable::new()
        .with_track("main", [9, 4])
        .with_track("gpu", [12])
}

/// 1.5s to 2.0s over the "main" track.
pub fn main_area() -> Area {
    Area::new(1.5, 2.0, vec!["main".to_string()])
}

pub fn slice(column: &str) -> TableColumn {
    TableColumn::regular("slice", column)
}

pub fn agg(function: AggregationFunction, column: TableColumn) -> Aggregation {
    Aggregation::new(function, column)
}

/// Area set, no pivots and no aggregations.
pub fn base_state() -> PivotTableState {
    PivotTableState::new().with_area(main_area())
}

pub fn thread_name() -> RegularColumn {
    RegularColumn::new("thread", "name")
}

pub fn process_pid() -> RegularColumn {
    RegularColumn::new("process", "pid")
}
