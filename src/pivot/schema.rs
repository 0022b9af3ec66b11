//! The fixed schema the pivot table queries against.
//!
//! Pivots come from the `slice` fact table (or its arg sets) and from the
//! thread/process dimension tables reachable through the slice's track.

use super::column::{RegularColumn, TableColumn};

/// The fact table every pivot query aggregates.
pub const SLICE_TABLE_NAME: &str = "slice";

/// Slice column joining a row to its track.
pub const TRACK_ID_COLUMN: &str = "track_id";

/// A queryable table and the columns offered as pivots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }

    /// Every column of this table as a pivot candidate.
    pub fn pivot_columns(&self) -> impl Iterator<Item = TableColumn> + '_ {
        self.columns
            .iter()
            .map(move |column| TableColumn::regular(self.name, column))
    }
}

pub const SLICE_TABLE: Table = Table {
    name: SLICE_TABLE_NAME,
    columns: &["type", "ts", "dur", "category", "name", "depth"],
};

/// Columns of `slice` available for aggregation.
pub const SLICE_AGGREGATION_COLUMNS: &[&str] = &[
    "ts",
    "dur",
    "depth",
    "thread_ts",
    "thread_dur",
    "thread_instruction_count",
    "thread_instruction_delta",
];

/// Tables available to pivot on, used to populate column selectors.
pub const TABLES: &[Table] = &[
    SLICE_TABLE,
    Table {
        name: "process",
        columns: &[
            "type",
            "pid",
            "name",
            "parent_upid",
            "uid",
            "android_appid",
            "cmdline",
        ],
    },
    Table {
        name: "thread",
        columns: &["type", "name", "tid", "upid", "is_main_thread"],
    },
    Table {
        name: "thread_track",
        columns: &["type", "name", "utid"],
    },
];

/// Look up a known table by name.
pub fn table(name: &str) -> Option<&'static Table> {
    TABLES.iter().find(|t| t.name == name)
}

/// Whether `column` names a known table and one of its columns.
pub fn is_known_column(column: &RegularColumn) -> bool {
    table(&column.table).is_some_and(|t| t.has_column(&column.column))
}

/// Whether `column` is a regular column of the fact table.
pub fn is_slice_column(column: &RegularColumn) -> bool {
    column.table == SLICE_TABLE_NAME
}

/// Whether `column` can be aggregated.
///
/// Any slice aggregation column or any argument; COUNT accepts anything.
pub fn is_aggregatable(column: &TableColumn) -> bool {
    match column {
        TableColumn::Regular(regular) => {
            is_slice_column(regular) && SLICE_AGGREGATION_COLUMNS.contains(&regular.column.as_str())
        }
        TableColumn::Argument(_) => true,
    }
}
