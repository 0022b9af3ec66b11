//! # pivot-query
//!
//! Turns a pivot table specification into a single two-level aggregation
//! query against the trace processor's slice schema.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              PivotTableState (specification)             │
//! │   (pivots, aggregations, selection area, sort order)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [generator + AreaResolver]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Query AST (inner pre-aggregation + rollup)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql token stream]
//! ┌─────────────────────────────────────────────────────────┐
//! │           SQL text + result column metadata              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pivot_query::prelude::*;
//!
//! let tracks = TrackTable::new().with_track("main", [1, 2]);
//! let state = PivotTableState::new()
//!     .with_area(Area::new(0.0, 1.0, vec!["main".into()]))
//!     .with_slice_pivot(TableColumn::regular("slice", "name"))
//!     .with_aggregation(Aggregation::new(
//!         AggregationFunction::Sum,
//!         TableColumn::regular("slice", "dur"),
//!     ));
//!
//! let query = generate_query_from_state(&state, &tracks).unwrap();
//! assert!(query.text.contains("SUM(preaggregated.agg_0) AS agg_0"));
//! ```

pub mod config;
pub mod pivot;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{GeneratorSettings, Settings};
    pub use crate::pivot::{
        generate_query_from_state, Aggregation, AggregationFunction, Area, AreaResolver,
        PivotQueryGenerator, PivotTableQuery, PivotTableState, QueryGeneratorError,
        RegularColumn, ResolvedArea, SortCriteria, SortDirection, TableColumn, TrackTable,
    };
    pub use crate::sql::{Dialect, Layout};
}

pub use pivot::{generate_query_from_state, PivotQueryGenerator, QueryGeneratorError};
