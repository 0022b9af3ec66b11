//! Pivot table query generation.
//!
//! - [`column`] - pivot and aggregation columns
//! - [`aggregation`] - aggregation functions and their rollups
//! - [`schema`] - the tables and columns offered to the UI
//! - [`area`] - selection areas and the area filter
//! - [`state`] - the pivot table specification
//! - [`generator`] - the two-level query builder

pub mod aggregation;
pub mod area;
pub mod column;
pub mod error;
pub mod generator;
pub mod schema;
pub mod state;

pub use aggregation::{aggregation_alias, Aggregation, AggregationFunction};
pub use area::{area_filter, to_ns, Area, AreaResolver, ResolvedArea, TrackTable};
pub use column::{
    extract_argument_expression, sqlite_string, ArgumentColumn, ColumnParseError, RegularColumn,
    TableColumn,
};
pub use error::{GeneratorResult, QueryGeneratorError};
pub use generator::{
    aggregation_index, generate_inner_query, generate_query_from_state, InnerQuery,
    PivotQueryGenerator, PivotTableQuery, PivotTableQueryMetadata,
};
pub use state::{PivotTableState, SelectedAggregations, SortCriteria, SortDirection};
